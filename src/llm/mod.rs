//! LLM module - Client per completion di chat (OpenAI) dietro il trait `CompletionClient`

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Chiavi sotto cui i modelli tendono a incapsulare una lista JSON
const LIST_KEYS: [&str; 5] = ["results", "suggestions", "synonyms", "data", "categories"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Parametri di una singola richiesta di completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: &'static str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Testo del primo choice, `None` se la risposta non ne contiene
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, LlmError>;
}

/// Contenuto di un eventuale blocco ```json della risposta
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Lista JSON della risposta: un array, oppure un oggetto con l'array sotto una chiave nota
pub fn parse_json_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, serde_json::Error> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let list = match value {
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| map.remove(*key))
            .unwrap_or(Value::Object(map)),
        other => other,
    };
    serde_json::from_value(list)
}
