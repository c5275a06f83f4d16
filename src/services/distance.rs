//! Distance services - Distanza approssimativa tra utente e località di un annuncio

use crate::core::{AppError, AppState};
use crate::dtos::{DistanceRequestDTO, DistanceResponseDTO};
use crate::geo::{Coordinates, distance_km, location_query, round_to_tenth};
use axum::extract::{Json, State};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(state, body), fields(city = ?body.post_city))]
pub async fn calculate_distance(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DistanceRequestDTO>,
) -> Result<Json<DistanceResponseDTO>, AppError> {
    debug!("Calculating distance to post location");
    // 1. Verificare i parametri obbligatori (0 è una coordinata valida)
    let (Some(user_lat), Some(user_lon), Some(city)) = (
        body.user_lat,
        body.user_lon,
        body.post_city.as_deref().map(str::trim).filter(|c| !c.is_empty()),
    ) else {
        warn!("Missing required parameters");
        return Err(AppError::bad_request("Missing required parameters"));
    };

    // 2. Geocoding della località, un solo tentativo
    let query = location_query(city, body.post_district.as_deref());
    let target = match state.geocoder.geocode(&query).await {
        Ok(Some(coordinates)) => coordinates,
        Ok(None) => {
            warn!(query, "Geocoder returned no results");
            return Err(AppError::bad_request("Could not geocode city"));
        }
        Err(e) => {
            warn!(query, "Geocoding failed: {}", e);
            return Err(AppError::bad_request("Could not geocode city"));
        }
    };

    // 3. Haversine e arrotondamento a un decimale
    let origin = Coordinates {
        lat: user_lat,
        lon: user_lon,
    };
    let distance = round_to_tenth(distance_km(origin, target));

    info!(distance, "Distance calculated");
    Ok(Json(DistanceResponseDTO { distance }))
}
