//! Geo module - Stima della distanza tra l'utente e la località di un annuncio
//!
//! - `haversine`: distanza ortodromica su sfera terrestre
//! - `nominatim`: geocoder HTTP (OpenStreetMap) dietro il trait `Geocoder`

pub mod haversine;
pub mod nominatim;

pub use haversine::{EARTH_RADIUS_KM, distance_km, round_to_tenth};
pub use nominatim::NominatimGeocoder;

use async_trait::async_trait;
use thiserror::Error;

/// Coordinate in gradi decimali
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(u16),

    #[error("invalid coordinate in response: {0}")]
    Parse(String),
}

/// Risoluzione testo libero -> coordinate.
/// `Ok(None)` quando il servizio risponde ma non trova risultati.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Query inviata al geocoder: "{district}, {city}, Poland" oppure "{city}, Poland"
pub fn location_query(city: &str, district: Option<&str>) -> String {
    match district.map(str::trim).filter(|d| !d.is_empty()) {
        Some(district) => format!("{}, {}, Poland", district, city.trim()),
        None => format!("{}, Poland", city.trim()),
    }
}
