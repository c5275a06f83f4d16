//! Booking entity - Prenotazione di un servizio tra cliente e fornitore

use super::enums::BookingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub post_id: Option<Uuid>,
    pub provider_id: Uuid,
    pub client_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub client_notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slot occupato nel calendario del fornitore, senza dati del cliente
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct BookingSlot {
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub duration_minutes: i32,
}
