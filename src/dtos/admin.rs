//! Admin DTOs - gestione utenti, log attività e storico ban

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserActionBodyDTO {
    pub action: String,
    pub reason: Option<String>,
    pub report_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct MessageResultDTO {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct DeleteMessageQuery {
    pub report_id: Option<Uuid>,
    pub reason: Option<String>,
}

/// Riga da inserire in `user_bans`
#[derive(Debug, Clone)]
pub struct CreateUserBanDTO {
    pub user_id: Uuid,
    pub banned_by: Uuid,
    pub reason: String,
    pub report_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Riga da inserire in `activity_logs`
#[derive(Debug, Clone)]
pub struct CreateActivityLogDTO {
    pub user_id: Uuid,
    pub activity_type: &'static str,
    pub post_id: Option<Uuid>,
    pub metadata: serde_json::Value,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredPostsDTO {
    pub success: bool,
    pub message: &'static str,
    pub expired_count: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
