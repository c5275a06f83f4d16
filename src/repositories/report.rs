//! Repository per le segnalazioni di post e messaggi

use super::{Create, Read, Update};
use crate::dtos::{CreateReportDTO, UpdateReportDTO};
use crate::entities::{MessageReport, PostReport, ReportedPost};
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PostReportRepository {
    connection_pool: PgPool,
}

impl PostReportRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// true se l'utente ha già segnalato il post
    pub async fn exists(&self, post_id: &Uuid, reporter_id: &Uuid) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM post_reports WHERE post_id = $1 AND reporter_id = $2)",
        )
        .bind(post_id)
        .bind(reporter_id)
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Post segnalati aggregati (stored procedure `get_reported_posts`)
    pub async fn find_reported_posts(&self) -> Result<Vec<ReportedPost>, Error> {
        sqlx::query_as::<_, ReportedPost>(
            r#"
            SELECT post_id, title, author_id, report_count, pending_count, last_reported_at
            FROM get_reported_posts()
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<PostReport, CreateReportDTO> for PostReportRepository {
    async fn create(&self, data: &CreateReportDTO) -> Result<PostReport, Error> {
        sqlx::query_as::<_, PostReport>(
            r#"
            INSERT INTO post_reports (post_id, reporter_id, reason, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, reporter_id, reason, description, status, created_at
            "#,
        )
        .bind(data.target_id)
        .bind(data.reporter_id)
        .bind(&data.reason)
        .bind(&data.description)
        .fetch_one(&self.connection_pool)
        .await
    }
}

const MESSAGE_REPORT_COLUMNS: &str = r#"
    id, message_id, reporter_id, reason, description, status,
    reviewed_by, reviewed_at, notes, created_at
"#;

pub struct MessageReportRepository {
    connection_pool: PgPool,
}

impl MessageReportRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    pub async fn exists(&self, message_id: &Uuid, reporter_id: &Uuid) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM message_reports WHERE message_id = $1 AND reporter_id = $2)",
        )
        .bind(message_id)
        .bind(reporter_id)
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Traccia l'accesso di un admin a un messaggio segnalato
    pub async fn log_admin_access(
        &self,
        admin_id: &Uuid,
        message_id: &Uuid,
        report_id: Option<&Uuid>,
        reason: &str,
    ) -> Result<(), Error> {
        sqlx::query("SELECT log_admin_message_access($1, $2, $3, $4)")
            .bind(admin_id)
            .bind(message_id)
            .bind(report_id)
            .bind(reason)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }
}

impl Create<MessageReport, CreateReportDTO> for MessageReportRepository {
    async fn create(&self, data: &CreateReportDTO) -> Result<MessageReport, Error> {
        let query = format!(
            r#"
            INSERT INTO message_reports (message_id, reporter_id, reason, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {MESSAGE_REPORT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, MessageReport>(&query)
            .bind(data.target_id)
            .bind(data.reporter_id)
            .bind(&data.reason)
            .bind(&data.description)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Read<MessageReport, Uuid> for MessageReportRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<MessageReport>, Error> {
        let query = format!("SELECT {MESSAGE_REPORT_COLUMNS} FROM message_reports WHERE id = $1");
        sqlx::query_as::<_, MessageReport>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<MessageReport, UpdateReportDTO, Uuid> for MessageReportRepository {
    async fn update(&self, id: &Uuid, data: &UpdateReportDTO) -> Result<MessageReport, Error> {
        let query = format!(
            r#"
            UPDATE message_reports
            SET status = $2, reviewed_by = $3, reviewed_at = now(), notes = $4
            WHERE id = $1
            RETURNING {MESSAGE_REPORT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, MessageReport>(&query)
            .bind(id)
            .bind(data.status)
            .bind(data.reviewed_by)
            .bind(&data.notes)
            .fetch_one(&self.connection_pool)
            .await
    }
}
