//! Admin report services - Revisione delle segnalazioni di post e messaggi

use crate::core::{AppError, AppState};
use crate::dtos::{
    DeleteMessageQuery, MessageResultDTO, UpdateReportDTO, UpdateReportStatusBodyDTO,
    validation::normalize_text,
};
use crate::entities::{MessageReport, Profile, ReportStatus, ReportedPost};
use crate::repositories::{Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[instrument(skip(state))]
pub async fn list_reported_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReportedPost>>, AppError> {
    let posts = state.post_reports.find_reported_posts().await?;
    debug!("Found {} reported posts", posts.len());
    Ok(Json(posts))
}

#[instrument(skip(state, admin, body), fields(admin_id = %admin.id, report_id = %report_id, status = ?body.status))]
pub async fn update_message_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
    Extension(admin): Extension<Profile>,
    Json(body): Json<UpdateReportStatusBodyDTO>,
) -> Result<Json<MessageReport>, AppError> {
    // 1. Una segnalazione revisionata non torna pending
    if body.status == ReportStatus::Pending {
        return Err(AppError::bad_request("Invalid status"));
    }

    let report = state
        .message_reports
        .read(&report_id)
        .await?
        .ok_or_else(|| AppError::not_found("Report not found"))?;

    // 2. Accesso dell'admin al messaggio tracciato
    state
        .message_reports
        .log_admin_access(
            &admin.id,
            &report.message_id,
            Some(&report.id),
            "Przegląd zgłoszenia",
        )
        .await?;

    // 3. Aggiornamento stato
    let updated = state
        .message_reports
        .update(
            &report_id,
            &UpdateReportDTO {
                status: body.status,
                reviewed_by: admin.id,
                notes: body.notes.as_deref().and_then(normalize_text),
            },
        )
        .await?;

    info!("Message report updated");
    Ok(Json(updated))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id, message_id = %message_id))]
pub async fn delete_reported_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
    Extension(admin): Extension<Profile>,
    Query(params): Query<DeleteMessageQuery>,
) -> Result<Json<MessageResultDTO>, AppError> {
    let reason = params
        .reason
        .as_deref()
        .and_then(normalize_text)
        .ok_or_else(|| AppError::bad_request("Reason is required"))?;

    // 1. Il messaggio deve esistere
    if state.messages.read(&message_id).await?.is_none() {
        warn!("Message not found");
        return Err(AppError::not_found("Message not found"));
    }

    // 2. Accesso tracciato prima della cancellazione
    state
        .message_reports
        .log_admin_access(&admin.id, &message_id, params.report_id.as_ref(), &reason)
        .await?;

    // 3. Cancellazione
    state.messages.delete(&message_id).await?;

    // 4. Chiusura della segnalazione collegata
    if let Some(report_id) = params.report_id {
        state
            .message_reports
            .update(
                &report_id,
                &UpdateReportDTO {
                    status: ReportStatus::Resolved,
                    reviewed_by: admin.id,
                    notes: Some(format!("Wiadomość usunięta. Powód: {}", reason)),
                },
            )
            .await?;
    }

    info!("Reported message deleted");
    Ok(Json(MessageResultDTO {
        success: true,
        message: "Message deleted".to_string(),
    }))
}
