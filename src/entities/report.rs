//! Report entities - Segnalazioni di post e messaggi

use super::enums::ReportStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct PostReport {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct MessageReport {
    pub id: Uuid,
    pub message_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Riga restituita dalla stored procedure `get_reported_posts`
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ReportedPost {
    pub post_id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub report_count: i64,
    pub pending_count: i64,
    pub last_reported_at: DateTime<Utc>,
}
