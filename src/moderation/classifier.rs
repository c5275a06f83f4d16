//! Classificatore di contenuti via completion: punteggi nsfw/toxic in 0..1

use crate::llm::{ChatMessage, CompletionClient, CompletionRequest, LlmError, strip_code_fence};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

const CLASSIFIER_MODEL: &str = "gpt-4o-mini";
const CLASSIFIER_TEMPERATURE: f32 = 0.0;
const CLASSIFIER_MAX_TOKENS: u32 = 60;

const CLASSIFIER_SYSTEM_PROMPT: &str = "Jesteś moderatorem treści serwisu ogłoszeń. Oceń tekst i odpowiedz wyłącznie obiektem JSON {\"nsfw\": liczba 0-1, \"toxic\": liczba 0-1}, bez komentarzy.";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentScores {
    #[serde(default)]
    pub nsfw: f64,
    #[serde(default)]
    pub toxic: f64,
}

impl ContentScores {
    fn clamped(self) -> Self {
        Self {
            nsfw: self.nsfw.clamp(0.0, 1.0),
            toxic: self.toxic.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("empty classifier response")]
    Empty,

    #[error("invalid classifier response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[instrument(skip(llm, text), fields(chars = text.chars().count()))]
pub async fn classify(llm: &dyn CompletionClient, text: &str) -> Result<ContentScores, ClassifierError> {
    let request = CompletionRequest {
        model: CLASSIFIER_MODEL,
        messages: vec![
            ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
            ChatMessage::user(text),
        ],
        temperature: CLASSIFIER_TEMPERATURE,
        max_tokens: CLASSIFIER_MAX_TOKENS,
    };

    let raw = llm.complete(request).await?.ok_or(ClassifierError::Empty)?;
    let scores = parse_scores(&raw)?;
    debug!(nsfw = scores.nsfw, toxic = scores.toxic, "Content classified");
    Ok(scores)
}

/// JSON della risposta, eventualmente dentro un blocco ```json
pub fn parse_scores(raw: &str) -> Result<ContentScores, serde_json::Error> {
    let scores: ContentScores = serde_json::from_str(strip_code_fence(raw))?;
    Ok(scores.clamped())
}
