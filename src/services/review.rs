//! Review services - Recensioni tra utenti

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{
    CreateActivityLogDTO, CreateReviewBodyDTO, CreateReviewDTO, RespondReviewBodyDTO,
    ReviewCreatedDTO, ReviewIdBodyDTO, ReviewsListDTO, ReviewsQuery, SuccessDTO,
    validation::normalize_text,
};
use crate::entities::BookingStatus;
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, Query, State},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Nome mostrato quando il profilo non ha un nome
const FALLBACK_USER_NAME: &str = "Użytkownik";

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReviewsQuery>,
) -> Result<Json<ReviewsListDTO>, AppError> {
    let user_id = params
        .user_id
        .ok_or_else(|| AppError::bad_request("User ID is required"))?;

    let reviews = state.reviews.find_received_by(&user_id).await?;
    debug!("Found {} reviews", reviews.len());
    Ok(Json(ReviewsListDTO { reviews }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<CreateReviewBodyDTO>,
) -> Result<Json<ReviewCreatedDTO>, AppError> {
    debug!("Creating review");
    // 1. Validazione del body (rating 1..5)
    body.validate()?;

    let (Some(reviewed_id), Some(rating)) = (body.reviewed_id, body.rating) else {
        warn!("Missing required fields");
        return Err(AppError::bad_request("Missing required fields"));
    };

    // 2. Nessuna auto-recensione
    if reviewed_id == current_user.id {
        warn!("Self review rejected");
        return Err(AppError::bad_request("You cannot review yourself"));
    }

    // 3. Se legata a una prenotazione: solo il cliente, solo a prenotazione conclusa, una volta
    if let Some(booking_id) = body.booking_id {
        check_booking_reviewable(&state, &booking_id, &current_user.id).await?;
    }

    // 4. Inserimento
    let review = state
        .reviews
        .create(&CreateReviewDTO {
            reviewer_id: current_user.id,
            reviewed_id,
            post_id: body.post_id,
            booking_id: body.booking_id,
            rating,
            comment: body.comment.as_deref().and_then(normalize_text),
        })
        .await?;

    if let Some(booking_id) = body.booking_id {
        if let Err(e) = state
            .bookings
            .set_status(&booking_id, BookingStatus::Reviewed)
            .await
        {
            warn!("Failed to mark booking as reviewed: {:?}", e);
        }
    }

    // 5. Notifica all'utente recensito tramite activity log, non bloccante
    let reviewer_name = state
        .profiles
        .display_name(&current_user.id)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_string());

    let log = CreateActivityLogDTO {
        user_id: reviewed_id,
        activity_type: "review_received",
        post_id: body.post_id,
        metadata: json!({
            "reviewer_name": reviewer_name,
            "rating": rating,
            "booking_id": body.booking_id,
        }),
    };
    if let Err(e) = state.activity_logs.create(&log).await {
        warn!("Failed to write activity log: {:?}", e);
    }

    info!(review_id = %review.id, "Review created");
    Ok(Json(ReviewCreatedDTO {
        success: true,
        review,
    }))
}

async fn check_booking_reviewable(
    state: &AppState,
    booking_id: &Uuid,
    user_id: &Uuid,
) -> Result<(), AppError> {
    let booking = state.bookings.read(booking_id).await?.ok_or_else(|| {
        warn!(booking_id = %booking_id, "Booking not found");
        AppError::not_found("Booking not found")
    })?;

    if booking.client_id != *user_id {
        warn!("Only the client can review a booking");
        return Err(AppError::forbidden("You cannot review this booking"));
    }
    if !booking.status.allows_review() {
        return Err(AppError::bad_request("Only completed bookings can be reviewed"));
    }
    if state.reviews.exists_for_booking(booking_id).await? {
        return Err(AppError::bad_request("This booking has already been reviewed"));
    }
    Ok(())
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn respond_to_review(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<RespondReviewBodyDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    let review_id = body
        .review_id
        .ok_or_else(|| AppError::bad_request("Review ID is required"))?;
    let response = body
        .response
        .as_deref()
        .and_then(normalize_text)
        .ok_or_else(|| AppError::bad_request("Response cannot be empty"))?;

    // solo l'utente recensito può rispondere
    let review = state
        .reviews
        .read(&review_id)
        .await?
        .filter(|r| r.reviewed_id == current_user.id)
        .ok_or_else(|| {
            warn!(review_id = %review_id, "Review not found or not owned");
            AppError::not_found("Review not found or unauthorized")
        })?;

    state.reviews.respond(&review.id, &response).await?;

    info!(review_id = %review.id, "Review response saved");
    Ok(Json(SuccessDTO::ok()))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn request_review_deletion(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<ReviewIdBodyDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    let review_id = body
        .review_id
        .ok_or_else(|| AppError::bad_request("Review ID is required"))?;

    let review = state
        .reviews
        .read(&review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    if review.reviewed_id != current_user.id {
        warn!("Deletion requested by a user who was not reviewed");
        return Err(AppError::forbidden("Forbidden"));
    }

    let requester_name = state
        .profiles
        .display_name(&current_user.id)
        .await?
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_string());

    // la richiesta arriva al recensore come activity log
    state
        .activity_logs
        .create(&CreateActivityLogDTO {
            user_id: review.reviewer_id,
            activity_type: "review_deletion_request",
            post_id: review.post_id,
            metadata: json!({ "requester_name": requester_name, "review_id": review.id }),
        })
        .await?;

    info!(review_id = %review.id, "Review deletion requested");
    Ok(Json(SuccessDTO::ok()))
}
