use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::demo::DEMO_REPLY_DELAY;
use crate::core::model_directory::{DEFAULT_MODEL, MODELS_TIMEOUT};
use crate::ui::theme::ThemeKind;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Keys accepted by `ollama-chat set` / `unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "backend-url",
    "default-model",
    "theme",
    "models-timeout-ms",
    "demo-delay-ms",
];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat backend (e.g., "http://localhost:8000")
    pub backend_url: Option<String>,
    pub default_model: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    pub models_timeout_ms: Option<u64>,
    pub demo_delay_ms: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let proj_dirs = ProjectDirs::from("org", "ollama-chat", "ollama-chat")
            .ok_or("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn default_model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn theme(&self) -> ThemeKind {
        self.theme
            .as_deref()
            .and_then(ThemeKind::from_name)
            .unwrap_or_default()
    }

    pub fn models_timeout(&self) -> Duration {
        self.models_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(MODELS_TIMEOUT)
    }

    pub fn demo_delay(&self) -> Duration {
        self.demo_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEMO_REPLY_DELAY)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {key}"));
        }
        match key {
            "backend-url" => self.backend_url = Some(value.to_string()),
            "default-model" => self.default_model = Some(value.to_string()),
            "theme" => {
                let theme = ThemeKind::from_name(value)
                    .ok_or_else(|| format!("Unknown theme: {value} (expected dark or light)"))?;
                self.theme = Some(theme.as_str().to_string());
            }
            "models-timeout-ms" => self.models_timeout_ms = Some(parse_millis(key, value)?),
            "demo-delay-ms" => self.demo_delay_ms = Some(parse_millis(key, value)?),
            _ => return Err(format!("Unknown config key: {key}")),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), String> {
        match key {
            "backend-url" => self.backend_url = None,
            "default-model" => self.default_model = None,
            "theme" => self.theme = None,
            "models-timeout-ms" => self.models_timeout_ms = None,
            "demo-delay-ms" => self.demo_delay_ms = None,
            _ => return Err(format!("Unknown config key: {key}")),
        }
        Ok(())
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        print_entry("backend-url", self.backend_url.as_deref());
        print_entry("default-model", self.default_model.as_deref());
        print_entry("theme", self.theme.as_deref());
        print_entry(
            "models-timeout-ms",
            self.models_timeout_ms.map(|v| v.to_string()).as_deref(),
        );
        print_entry(
            "demo-delay-ms",
            self.demo_delay_ms.map(|v| v.to_string()).as_deref(),
        );
    }
}

fn print_entry(key: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("  {key}: {value}"),
        None => println!("  {key}: (unset)"),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("{key} expects a whole number of milliseconds, got {value}"))
}
