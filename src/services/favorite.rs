//! Favorite services - Annunci preferiti dell'utente

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{
    CreateFavoriteDTO, FavoriteBodyDTO, FavoriteCreatedDTO, FavoritesListDTO, SuccessDTO,
};
use crate::repositories::{Create, Delete};
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
) -> Result<Json<FavoritesListDTO>, AppError> {
    debug!("Listing favorites");
    let favorites = state.favorites.find_post_ids_by_user(&current_user.id).await?;
    info!("Found {} favorites", favorites.len());
    Ok(Json(FavoritesListDTO { favorites }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<FavoriteBodyDTO>,
) -> Result<Json<FavoriteCreatedDTO>, AppError> {
    let post_id = body.post_id.ok_or_else(|| {
        warn!("Missing postId");
        AppError::bad_request("Post ID is required")
    })?;

    let favorite = state
        .favorites
        .create(&CreateFavoriteDTO {
            user_id: current_user.id,
            post_id,
        })
        .await?;

    info!(post_id = %post_id, "Favorite added");
    Ok(Json(FavoriteCreatedDTO {
        success: true,
        favorite,
    }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<FavoriteBodyDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    let post_id = body.post_id.ok_or_else(|| {
        warn!("Missing postId");
        AppError::bad_request("Post ID is required")
    })?;

    // rimuovere un preferito inesistente non è un errore
    let removed = state.favorites.delete(&(current_user.id, post_id)).await?;
    info!(post_id = %post_id, removed, "Favorite removed");
    Ok(Json(SuccessDTO::ok()))
}
