//! WebSocket Event DTOs - Data Transfer Objects per eventi WebSocket

use crate::dtos::MessageDTO;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eventi inviati dal client.
/// Tagged union, serde li legge come:
/// { "type": "Typing", "data": { "conversation_id": "...", "is_typing": true } }
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ClientEventDTO {
    Subscribe { conversation_id: String },
    Unsubscribe { conversation_id: String },
    Typing { conversation_id: String, is_typing: bool },
}

/// Eventi inviati dal server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ServerEventDTO {
    Typing(TypingEventDTO),
    NewMessage(MessageDTO),
    Error { code: u16, message: String },
}

/// Evento di digitazione effimero, mai persistito
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypingEventDTO {
    pub user_id: Uuid,
    pub is_typing: bool,
    pub conversation_id: String,
}
