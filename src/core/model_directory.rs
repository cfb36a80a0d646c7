//! Startup discovery of the models the backend can serve.

use std::time::Duration;

use tracing::{debug, warn};

use crate::api::models::fetch_models;

pub const DEFAULT_MODEL: &str = "llama3.2:3b";

pub const MODELS_TIMEOUT: Duration = Duration::from_millis(5000);

pub const FALLBACK_MODELS: [&str; 5] = [
    "llama3.2:3b",
    "llama3.2:1b",
    "codellama:7b",
    "mistral:7b",
    "phi3:mini",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDirectory {
    pub models: Vec<String>,
    pub connected: bool,
}

impl ModelDirectory {
    pub fn fallback() -> Self {
        Self {
            models: FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            connected: false,
        }
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    /// The model after `current`, wrapping around. Falls back to the first
    /// entry when `current` is not listed.
    pub fn next_after(&self, current: &str) -> Option<&str> {
        self.step(current, 1)
    }

    pub fn previous_before(&self, current: &str) -> Option<&str> {
        self.step(current, self.models.len().saturating_sub(1))
    }

    fn step(&self, current: &str, offset: usize) -> Option<&str> {
        let len = self.models.len();
        if len == 0 {
            return None;
        }
        let index = match self.models.iter().position(|m| m == current) {
            Some(pos) => (pos + offset) % len,
            None => 0,
        };
        self.models.get(index).map(String::as_str)
    }
}

/// Query the backend's model directory. Never fails: any error yields the
/// fallback list with `connected == false`.
pub async fn discover(client: &reqwest::Client, base_url: &str, timeout: Duration) -> ModelDirectory {
    match fetch_models(client, base_url, timeout).await {
        Ok(response) => {
            debug!(count = response.models.len(), "model directory loaded");
            ModelDirectory {
                models: response.models,
                connected: true,
            }
        }
        Err(err) => {
            warn!(error = %err, "backend not available, using demo mode");
            ModelDirectory::fallback()
        }
    }
}
