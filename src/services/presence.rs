//! Presence services - Stato online/away/offline degli utenti

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{PresenceDTO, SuccessDTO, UpdatePresenceDTO};
use crate::entities::PresenceStatus;
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id, status = ?body.status))]
pub async fn update_presence(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<UpdatePresenceDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    state
        .presence
        .update_status(&current_user.id, body.status)
        .await?;
    debug!("Presence updated");
    Ok(Json(SuccessDTO::ok()))
}

/// Stato di presenza letto applicando il timeout: un heartbeat troppo vecchio vale offline
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PresenceDTO>, AppError> {
    let presence = state.presence.read(&user_id).await?;

    let dto = match presence {
        Some(p) => PresenceDTO {
            status: p.effective_status(Utc::now(), state.presence_timeout),
            last_seen: p.last_seen,
        },
        None => PresenceDTO {
            status: PresenceStatus::Offline,
            last_seen: None,
        },
    };

    debug!(status = ?dto.status, "Presence read");
    Ok(Json(dto))
}
