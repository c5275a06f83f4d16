//! Booking DTOs

use crate::entities::{Booking, BookingSlot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Durata di default di una prenotazione, in minuti
pub const DEFAULT_BOOKING_MINUTES: i32 = 60;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlotsQuery {
    pub provider_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, Debug)]
pub struct BookingSlotsDTO {
    pub bookings: Vec<BookingSlot>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBodyDTO {
    pub provider_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 15, max = 720, message = "Duration must be between 15 and 720 minutes"))]
    pub duration_minutes: Option<i32>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub client_notes: Option<String>,
}

/// DTO per creare una nuova prenotazione (senza id), sempre in attesa
#[derive(Debug, Clone)]
pub struct CreateBookingDTO {
    pub post_id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub client_notes: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct BookingCreatedDTO {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingBodyDTO {
    pub booking_id: Option<Uuid>,
    pub status: Option<String>,
}
