//! Booking services - Calendario del fornitore, richieste e cambi di stato delle prenotazioni

use crate::core::{AppError, AppState, AuthUser};
use crate::dtos::{
    BookingCreatedDTO, BookingSlotsDTO, BookingSlotsQuery, CreateActivityLogDTO,
    CreateBookingBodyDTO, CreateBookingDTO, DEFAULT_BOOKING_MINUTES, SuccessDTO,
    UpdateBookingBodyDTO, validation::normalize_text,
};
use crate::entities::BookingStatus;
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Slot occupati del fornitore nel giorno indicato (UTC)
#[instrument(skip(state))]
pub async fn list_booking_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookingSlotsQuery>,
) -> Result<Json<BookingSlotsDTO>, AppError> {
    let (Some(provider_id), Some(date)) = (params.provider_id, params.date) else {
        return Err(AppError::bad_request("Missing required parameters"));
    };

    let (from, to) = day_bounds(date).ok_or_else(|| AppError::bad_request("Invalid date"))?;
    let bookings = state
        .bookings
        .find_busy_slots(&provider_id, from, to)
        .await?;

    debug!("Found {} busy slots", bookings.len());
    Ok(Json(BookingSlotsDTO { bookings }))
}

/// [inizio, inizio del giorno successivo) in UTC
fn day_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let from = date.and_hms_opt(0, 0, 0)?.and_utc();
    let to = date.checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?.and_utc();
    Some((from, to))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<CreateBookingBodyDTO>,
) -> Result<(StatusCode, Json<BookingCreatedDTO>), AppError> {
    debug!("Creating booking");
    // 1. Validazione
    body.validate()?;
    let (Some(provider_id), Some(post_id), Some(scheduled_at)) =
        (body.provider_id, body.post_id, body.scheduled_at)
    else {
        warn!("Missing required fields");
        return Err(AppError::bad_request("Missing required fields"));
    };

    if provider_id == current_user.id {
        warn!("Self booking rejected");
        return Err(AppError::bad_request("Cannot book your own service"));
    }

    // 2. L'annuncio deve appartenere al fornitore
    let post = state
        .posts
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    if post.user_id != provider_id {
        warn!(post_id = %post_id, "Post does not belong to the provider");
        return Err(AppError::bad_request("Post does not belong to this provider"));
    }

    // 3. Inserimento, sempre in attesa di conferma
    let booking = state
        .bookings
        .create(&CreateBookingDTO {
            post_id,
            provider_id,
            client_id: current_user.id,
            scheduled_at,
            duration_minutes: body.duration_minutes.unwrap_or(DEFAULT_BOOKING_MINUTES),
            client_notes: body.client_notes.as_deref().and_then(normalize_text),
        })
        .await?;

    // 4. Notifica al fornitore, non bloccante
    let log = CreateActivityLogDTO {
        user_id: provider_id,
        activity_type: "booking_request",
        post_id: Some(post_id),
        metadata: json!({
            "booking_id": booking.id,
            "client_id": current_user.id,
            "post_title": post.title,
            "scheduled_at": scheduled_at,
        }),
    };
    if let Err(e) = state.activity_logs.create(&log).await {
        warn!("Failed to write activity log: {:?}", e);
    }

    info!(booking_id = %booking.id, "Booking created");
    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedDTO {
            success: true,
            booking,
        }),
    ))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthUser>,
    Json(body): Json<UpdateBookingBodyDTO>,
) -> Result<Json<SuccessDTO>, AppError> {
    let (Some(booking_id), Some(status)) = (body.booking_id, body.status.as_deref()) else {
        return Err(AppError::bad_request("Missing required fields"));
    };
    let status =
        BookingStatus::from_str(status).map_err(|_| AppError::bad_request("Invalid status"))?;

    // 1. Solo cliente e fornitore
    let booking = state
        .bookings
        .read(&booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    let other_party = if current_user.id == booking.provider_id {
        booking.client_id
    } else if current_user.id == booking.client_id {
        booking.provider_id
    } else {
        warn!(booking_id = %booking_id, "User is not part of the booking");
        return Err(AppError::forbidden("Forbidden"));
    };

    // 2. Aggiornamento
    if !state.bookings.set_status(&booking_id, status).await? {
        return Err(AppError::not_found("Booking not found"));
    }

    // 3. Notifica all'altra parte, non bloccante
    let log = CreateActivityLogDTO {
        user_id: other_party,
        activity_type: "booking_status_changed",
        post_id: booking.post_id,
        metadata: json!({
            "booking_id": booking_id,
            "status": status,
            "status_label": status.label(),
        }),
    };
    if let Err(e) = state.activity_logs.create(&log).await {
        warn!("Failed to write activity log: {:?}", e);
    }

    info!(booking_id = %booking_id, status = status.label(), "Booking status updated");
    Ok(Json(SuccessDTO::ok()))
}
