//! Presence DTOs

use crate::entities::PresenceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdatePresenceDTO {
    pub status: PresenceStatus,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PresenceDTO {
    pub status: PresenceStatus,
    pub last_seen: Option<DateTime<Utc>>,
}
