//! FavoriteRepository - Repository per i preferiti

use super::{Create, Delete};
use crate::dtos::CreateFavoriteDTO;
use crate::entities::Favorite;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct FavoriteRepository {
    connection_pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Id dei post preferiti dell'utente, più recenti prima
    pub async fn find_post_ids_by_user(&self, user_id: &Uuid) -> Result<Vec<Uuid>, Error> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT post_id FROM favorites WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Favorite, CreateFavoriteDTO> for FavoriteRepository {
    async fn create(&self, data: &CreateFavoriteDTO) -> Result<Favorite, Error> {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, post_id)
            VALUES ($1, $2)
            RETURNING user_id, post_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.post_id)
        .fetch_one(&self.connection_pool)
        .await
    }
}

/// Chiave composta (user_id, post_id)
impl Delete<(Uuid, Uuid)> for FavoriteRepository {
    async fn delete(&self, id: &(Uuid, Uuid)) -> Result<bool, Error> {
        let (user_id, post_id) = id;
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
