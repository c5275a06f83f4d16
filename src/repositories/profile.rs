//! ProfileRepository - Repository per i profili utente

use super::{Delete, Read};
use crate::entities::Profile;
use sqlx::{Error, PgPool};
use uuid::Uuid;

const PROFILE_COLUMNS: &str =
    "id, full_name, avatar_url, role, banned, ban_reason, banned_at, banned_by, created_at";

pub struct ProfileRepository {
    connection_pool: PgPool,
}

impl ProfileRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Segna il profilo come bannato. Ritorna false se il profilo non esiste.
    pub async fn ban(&self, user_id: &Uuid, banned_by: &Uuid, reason: &str) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET banned = TRUE, ban_reason = $2, banned_at = now(), banned_by = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(reason)
        .bind(banned_by)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Rimuove il ban e tutti i campi collegati
    pub async fn unban(&self, user_id: &Uuid) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET banned = FALSE, ban_reason = NULL, banned_at = NULL, banned_by = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Nome visualizzato, usato nei metadata dei log di attività
    pub async fn display_name(&self, user_id: &Uuid) -> Result<Option<String>, Error> {
        let name = sqlx::query_scalar::<_, Option<String>>(
            "SELECT full_name FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(name.flatten())
    }
}

impl Read<Profile, Uuid> for ProfileRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Profile>, Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<Uuid> for ProfileRepository {
    /// Cancella il profilo; i post seguono via ON DELETE CASCADE
    async fn delete(&self, id: &Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
