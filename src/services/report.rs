//! Report services - Segnalazioni di annunci e messaggi da parte degli utenti

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{
    CreateMessageReportBodyDTO, CreatePostReportBodyDTO, CreateReportDTO, MESSAGE_REPORT_REASONS,
    validation::normalize_text,
};
use crate::entities::{MessageReport, PostReport};
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn report_post(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<CreatePostReportBodyDTO>,
) -> Result<(StatusCode, Json<PostReport>), AppError> {
    debug!("Creating post report");
    // 1. Validazione
    body.validate()?;
    let post_id = body
        .post_id
        .ok_or_else(|| AppError::bad_request("Post ID is required"))?;
    let reason = body
        .reason
        .as_deref()
        .and_then(normalize_text)
        .ok_or_else(|| AppError::bad_request("Reason is required"))?;

    // 2. Il post deve esistere e non essere del segnalante
    let author = state
        .posts
        .find_author(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    if author == current_user.id {
        warn!("User tried to report own post");
        return Err(AppError::bad_request("You cannot report your own post"));
    }

    // 3. Una sola segnalazione per utente e post
    if state.post_reports.exists(&post_id, &current_user.id).await? {
        warn!("Duplicate post report");
        return Err(AppError::conflict("You have already reported this post"));
    }

    // 4. Inserimento (stato pending)
    let report = state
        .post_reports
        .create(&CreateReportDTO {
            target_id: post_id,
            reporter_id: current_user.id,
            reason,
            description: body.description.as_deref().and_then(normalize_text),
        })
        .await?;

    info!(report_id = %report.id, "Post report created");
    Ok((StatusCode::CREATED, Json(report)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn report_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<CreateMessageReportBodyDTO>,
) -> Result<(StatusCode, Json<MessageReport>), AppError> {
    debug!("Creating message report");
    // 1. Validazione, il motivo deve essere tra quelli ammessi
    body.validate()?;
    let message_id = body
        .message_id
        .ok_or_else(|| AppError::bad_request("Message ID is required"))?;
    let reason = body
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| MESSAGE_REPORT_REASONS.contains(r))
        .ok_or_else(|| {
            AppError::bad_request("Invalid reason")
                .with_details(format!("Allowed reasons: {}", MESSAGE_REPORT_REASONS.join(", ")))
        })?
        .to_string();

    // 2. Una sola segnalazione per utente e messaggio
    if state
        .message_reports
        .exists(&message_id, &current_user.id)
        .await?
    {
        warn!("Duplicate message report");
        return Err(AppError::conflict("You have already reported this message"));
    }

    // 3. Il segnalante deve partecipare alla conversazione
    let message = state
        .messages
        .read(&message_id)
        .await?
        .ok_or_else(|| AppError::not_found("Message not found"))?;
    if !message.involves(&current_user.id) {
        warn!("User is not part of the conversation");
        return Err(AppError::forbidden("Forbidden"));
    }

    // 4. Inserimento
    let report = state
        .message_reports
        .create(&CreateReportDTO {
            target_id: message_id,
            reporter_id: current_user.id,
            reason,
            description: body.description.as_deref().and_then(normalize_text),
        })
        .await?;

    info!(report_id = %report.id, "Message report created");
    Ok((StatusCode::CREATED, Json(report)))
}
