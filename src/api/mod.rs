use serde::{Deserialize, Serialize};

/// Body of `POST /chat/stream`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub model: String,
}

/// Payload following the `data: ` prefix of a streamed record.
///
/// The backend sends `{"token": ...}` for generated text, `{"done": true}`
/// once generation finishes, and `{"error": ...}` when it could not reach
/// the model runtime.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct StreamRecord {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ModelsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub models: Vec<String>,
}

/// An explicit `null` list reads the same as an absent one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub ollama_connected: bool,
}

pub mod models;
