//! Message DTOs - Data Transfer Objects per messaggi

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDTO {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub post_id: Option<Uuid>,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            post_id: value.post_id,
            content: value.content,
            read: value.read,
            created_at: value.created_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBodyDTO {
    pub receiver_id: Uuid,
    pub post_id: Option<Uuid>,
    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,
}

impl SendMessageBodyDTO {
    /// Contenuto senza spazi iniziali e finali, da validare dopo il trim
    pub fn trimmed(self) -> Self {
        let content = self.content.trim().to_string();
        Self { content, ..self }
    }
}

/// DTO per creare un nuovo messaggio (senza id)
#[derive(Debug, Clone)]
pub struct CreateMessageDTO {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub post_id: Option<Uuid>,
    pub content: String,
}

/// DTO per query parameters di paginazione messaggi
#[derive(Deserialize, Debug, Default)]
pub struct MessagesQuery {
    #[serde(default)]
    pub before: Option<DateTime<Utc>>,
}
