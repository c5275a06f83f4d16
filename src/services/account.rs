//! Account services - Cancellazione dell'account da parte dell'utente

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{DeleteAccountBodyDTO, MessageResultDTO};
use crate::repositories::Delete;
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// L'id nel body deve essere quello dell'utente autenticato; annunci, messaggi
/// e prenotazioni seguono il profilo via ON DELETE CASCADE
#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<DeleteAccountBodyDTO>,
) -> Result<Json<MessageResultDTO>, AppError> {
    if body.user_id != Some(current_user.id) {
        warn!(requested = ?body.user_id, "Account deletion for another user rejected");
        return Err(AppError::unauthorized("Unauthorized"));
    }

    if !state.profiles.delete(&current_user.id).await? {
        return Err(AppError::not_found("User not found"));
    }

    info!("Account deleted");
    Ok(Json(MessageResultDTO {
        success: true,
        message: "Account deleted".to_string(),
    }))
}
