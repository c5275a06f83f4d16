//! Presence entity - Ultimo stato di presenza noto di un utente

use super::enums::PresenceStatus;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Presence {
    pub user_id: Uuid,
    pub status: PresenceStatus,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Presence {
    /// Stato effettivo: un `online` senza heartbeat recenti è considerato `offline`
    pub fn effective_status(&self, now: DateTime<Utc>, timeout: Duration) -> PresenceStatus {
        match (self.status, self.last_seen) {
            (PresenceStatus::Offline, _) => PresenceStatus::Offline,
            (_, None) => PresenceStatus::Offline,
            (status, Some(seen)) if now - seen <= timeout => status,
            _ => PresenceStatus::Offline,
        }
    }
}
