//! Message entity - Messaggio diretto tra due utenti

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub post_id: Option<Uuid>,
    pub content: String,
    pub read: bool,
    // il server si aspetta una stringa litterale iso8601 che viene parsata in oggetto DateTime di tipo UTC
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// true se l'utente è mittente o destinatario
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.sender_id == *user_id || self.receiver_id == *user_id
    }
}
