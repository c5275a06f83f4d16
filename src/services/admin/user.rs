//! Admin user services - Ban, sblocco e cancellazione degli account

use crate::core::auth::DEFAULT_BAN_REASON;
use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateUserBanDTO, MessageResultDTO, UpdateReportDTO, UserActionBodyDTO,
    validation::normalize_text,
};
use crate::entities::{Profile, ReportStatus};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const UNBAN_PREFIX: &str = "ODBANOWANIE";

#[debug_handler]
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id, user_id = %user_id, action = %body.action))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Extension(admin): Extension<Profile>,
    Json(body): Json<UserActionBodyDTO>,
) -> Result<Json<MessageResultDTO>, AppError> {
    // 1. Nessuna azione su se stessi
    if user_id == admin.id {
        warn!("Admin tried to change own ban state");
        return Err(AppError::bad_request("You cannot ban yourself"));
    }

    // 2. Profilo target
    let target = state
        .profiles
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let name = target
        .full_name
        .clone()
        .unwrap_or_else(|| target.id.to_string());
    let reason = body.reason.as_deref().and_then(normalize_text);

    match body.action.as_str() {
        "ban" => {
            if target.banned {
                return Err(AppError::conflict("User is already banned"));
            }
            let reason = reason.unwrap_or_else(|| DEFAULT_BAN_REASON.to_string());

            // 3. Ban sul profilo e storico
            state.profiles.ban(&user_id, &admin.id, &reason).await?;
            state
                .user_bans
                .create(&CreateUserBanDTO {
                    user_id,
                    banned_by: admin.id,
                    reason: reason.clone(),
                    report_id: body.report_id,
                    notes: body.notes.clone(),
                })
                .await?;

            // 4. Se il ban nasce da una segnalazione, la segnalazione è risolta
            if let Some(report_id) = body.report_id {
                state
                    .message_reports
                    .update(
                        &report_id,
                        &UpdateReportDTO {
                            status: ReportStatus::Resolved,
                            reviewed_by: admin.id,
                            notes: Some(format!("Użytkownik zbanowany. Powód: {}", reason)),
                        },
                    )
                    .await?;
            }

            info!("User banned");
            Ok(Json(MessageResultDTO {
                success: true,
                message: format!("Użytkownik {} zbanowany", name),
            }))
        }
        "unban" => {
            if !target.banned {
                return Err(AppError::conflict("User is not banned"));
            }

            state.profiles.unban(&user_id).await?;
            state
                .user_bans
                .create(&CreateUserBanDTO {
                    user_id,
                    banned_by: admin.id,
                    reason: format!("{}: {}", UNBAN_PREFIX, reason.unwrap_or_default()),
                    report_id: None,
                    notes: body.notes.clone(),
                })
                .await?;

            info!("User unbanned");
            Ok(Json(MessageResultDTO {
                success: true,
                message: format!("Użytkownik {} odbanowany", name),
            }))
        }
        _ => Err(AppError::bad_request("Invalid action")),
    }
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id, user_id = %user_id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Extension(admin): Extension<Profile>,
) -> Result<Json<MessageResultDTO>, AppError> {
    if user_id == admin.id {
        return Err(AppError::bad_request("Cannot delete yourself"));
    }

    // i post dell'utente seguono via ON DELETE CASCADE
    if !state.profiles.delete(&user_id).await? {
        return Err(AppError::not_found("User not found"));
    }

    info!("User deleted");
    Ok(Json(MessageResultDTO {
        success: true,
        message: "User deleted".to_string(),
    }))
}
