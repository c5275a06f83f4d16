use crate::entities::PresenceStatus;
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("presence endpoint returned status {0}")]
    Status(u16),
}

/// Destinazione degli aggiornamenti di presenza
#[async_trait]
pub trait PresenceReporter: Send + Sync {
    async fn report(&self, status: PresenceStatus) -> Result<(), PresenceError>;
}

/// Reporter che chiama `POST {base_url}/api/presence` con il token dell'utente
pub struct HttpPresenceReporter {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpPresenceReporter {
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/presence", base_url.trim_end_matches('/')),
            token: token.into(),
        }
    }
}

#[async_trait]
impl PresenceReporter for HttpPresenceReporter {
    #[instrument(skip(self))]
    async fn report(&self, status: PresenceStatus) -> Result<(), PresenceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "status": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PresenceError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
