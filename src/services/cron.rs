//! Cron services - Job di scadenza degli annunci, protetto da CRON_SECRET

use crate::core::{AppError, AppState};
use crate::dtos::ExpiredPostsDTO;
use axum::extract::{Json, State};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};

#[instrument(skip(state))]
pub async fn expire_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExpiredPostsDTO>, AppError> {
    let expired_count = state.posts.expire_old_posts().await.map_err(|e| {
        error!("Failed to expire posts: {:?}", e);
        AppError::internal_server_error("Failed to expire posts")
    })?;

    info!(expired_count, "Expired posts closed");
    Ok(Json(ExpiredPostsDTO {
        success: true,
        message: "Posts expired successfully",
        expired_count,
        timestamp: Utc::now(),
    }))
}
