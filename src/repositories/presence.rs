//! PresenceRepository - Stato di presenza degli utenti

use super::Read;
use crate::entities::{Presence, PresenceStatus};
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PresenceRepository {
    connection_pool: PgPool,
}

impl PresenceRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Upsert dello stato con `last_seen = now()` (stored procedure `update_user_presence`)
    pub async fn update_status(&self, user_id: &Uuid, status: PresenceStatus) -> Result<(), Error> {
        sqlx::query("SELECT update_user_presence($1, $2)")
            .bind(user_id)
            .bind(status)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }
}

impl Read<Presence, Uuid> for PresenceRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Presence>, Error> {
        sqlx::query_as::<_, Presence>(
            "SELECT user_id, status, last_seen FROM user_presence WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
