//! Report DTOs

use crate::entities::ReportStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Motivi ammessi per la segnalazione di un messaggio
pub const MESSAGE_REPORT_REASONS: [&str; 5] = ["spam", "harassment", "inappropriate", "scam", "other"];

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostReportBodyDTO {
    pub post_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Reason must be between 1 and 200 characters"))]
    pub reason: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageReportBodyDTO {
    pub message_id: Option<Uuid>,
    pub reason: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Inserimento di una segnalazione (post o messaggio): `target_id` è l'id segnalato
#[derive(Debug, Clone)]
pub struct CreateReportDTO {
    pub target_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateReportStatusBodyDTO {
    pub status: ReportStatus,
    pub notes: Option<String>,
}

/// Aggiornamento di una segnalazione da parte di un admin
#[derive(Debug, Clone)]
pub struct UpdateReportDTO {
    pub status: ReportStatus,
    pub reviewed_by: Uuid,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SuccessDTO {
    pub success: bool,
}

impl SuccessDTO {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
