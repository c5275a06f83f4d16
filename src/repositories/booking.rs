//! BookingRepository - Repository per le prenotazioni

use super::{Create, Read};
use crate::dtos::CreateBookingDTO;
use crate::entities::{Booking, BookingSlot, BookingStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, PgPool};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = r#"
    id, post_id, provider_id, client_id, scheduled_at, duration_minutes,
    client_notes, status, created_at, updated_at
"#;

pub struct BookingRepository {
    connection_pool: PgPool,
}

impl BookingRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Slot ancora occupati (in attesa o confermati) del fornitore in [from, to)
    pub async fn find_busy_slots(
        &self,
        provider_id: &Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BookingSlot>, Error> {
        sqlx::query_as::<_, BookingSlot>(
            r#"
            SELECT scheduled_at, status, duration_minutes
            FROM bookings
            WHERE provider_id = $1
              AND scheduled_at >= $2 AND scheduled_at < $3
              AND status IN ('pending', 'confirmed')
            ORDER BY scheduled_at
            "#,
        )
        .bind(provider_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Ritorna false se la prenotazione non esiste
    pub async fn set_status(&self, id: &Uuid, status: BookingStatus) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE bookings SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Create<Booking, CreateBookingDTO> for BookingRepository {
    async fn create(&self, data: &CreateBookingDTO) -> Result<Booking, Error> {
        let query = format!(
            r#"
            INSERT INTO bookings (post_id, provider_id, client_id, scheduled_at, duration_minutes, client_notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BOOKING_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(data.post_id)
            .bind(data.provider_id)
            .bind(data.client_id)
            .bind(data.scheduled_at)
            .bind(data.duration_minutes)
            .bind(&data.client_notes)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Read<Booking, Uuid> for BookingRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Booking>, Error> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
