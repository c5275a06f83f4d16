//! MessageRepository - Repository per i messaggi diretti

use super::{Create, Delete, Read};
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use chrono::{DateTime, Utc};
use sqlx::{Error, PgPool};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, post_id, content, read, created_at";

pub struct MessageRepository {
    connection_pool: PgPool,
}

impl MessageRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Messaggi scambiati tra due utenti, dal più recente al più vecchio.
    ///
    /// # Arguments
    /// * `before_date` - se presente, solo messaggi precedenti (paginazione all'indietro)
    /// * `limit` - numero massimo di messaggi ritornati
    pub async fn find_between(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
        before_date: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        let query = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE ((sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1))
              AND ($3::timestamptz IS NULL OR created_at < $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_a)
            .bind(user_b)
            .bind(before_date)
            .bind(limit)
            .fetch_all(&self.connection_pool)
            .await
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let query = format!(
            r#"
            INSERT INTO messages (sender_id, receiver_id, post_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(data.sender_id)
            .bind(data.receiver_id)
            .bind(data.post_id)
            .bind(&data.content)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Read<Message, Uuid> for MessageRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Message>, Error> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<Uuid> for MessageRepository {
    async fn delete(&self, id: &Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
