//! Repository per le tabelle di log (moderazione, attività, storico ban).
//! Solo inserimenti: la lettura avviene da strumenti esterni.

use super::Create;
use crate::dtos::{CreateActivityLogDTO, CreateModerationLogDTO, CreateUserBanDTO};
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct ModerationLogRepository {
    connection_pool: PgPool,
}

impl ModerationLogRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

impl Create<Uuid, CreateModerationLogDTO> for ModerationLogRepository {
    async fn create(&self, data: &CreateModerationLogDTO) -> Result<Uuid, Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO moderation_logs (post_id, admin_id, action, previous_status, new_status, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(data.post_id)
        .bind(data.admin_id)
        .bind(data.action)
        .bind(&data.previous_status)
        .bind(&data.new_status)
        .bind(&data.reason)
        .fetch_one(&self.connection_pool)
        .await
    }
}

pub struct ActivityLogRepository {
    connection_pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

impl Create<Uuid, CreateActivityLogDTO> for ActivityLogRepository {
    async fn create(&self, data: &CreateActivityLogDTO) -> Result<Uuid, Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO activity_logs (user_id, activity_type, post_id, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(data.user_id)
        .bind(data.activity_type)
        .bind(data.post_id)
        .bind(&data.metadata)
        .fetch_one(&self.connection_pool)
        .await
    }
}

pub struct UserBanRepository {
    connection_pool: PgPool,
}

impl UserBanRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

impl Create<Uuid, CreateUserBanDTO> for UserBanRepository {
    async fn create(&self, data: &CreateUserBanDTO) -> Result<Uuid, Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO user_bans (user_id, banned_by, reason, report_id, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(data.user_id)
        .bind(data.banned_by)
        .bind(&data.reason)
        .bind(data.report_id)
        .bind(&data.notes)
        .fetch_one(&self.connection_pool)
        .await
    }
}
