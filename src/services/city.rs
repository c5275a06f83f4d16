//! City services - Ricerca città per l'autocompletamento

use crate::core::{AppError, AppState};
use crate::dtos::{CitiesQuery, CitiesResponseDTO, validation::escape_like};
use axum::extract::{Json, Query, State};
use std::sync::Arc;
use tracing::{debug, instrument};

const CITIES_LIMIT: i64 = 10;
const MIN_QUERY_CHARS: usize = 2;

#[instrument(skip(state))]
pub async fn search_cities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CitiesQuery>,
) -> Result<Json<CitiesResponseDTO>, AppError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();

    // query troppo corta: città popolari
    let cities = if query.chars().count() < MIN_QUERY_CHARS {
        state.cities.find_popular(CITIES_LIMIT).await?
    } else {
        state.cities.search(&escape_like(query), CITIES_LIMIT).await?
    };

    debug!("Found {} cities", cities.len());
    Ok(Json(CitiesResponseDTO { cities }))
}
