//! Client Nominatim (OpenStreetMap). Una sola richiesta, nessun retry, nessuna cache.

use super::{Coordinates, GeocodeError, Geocoder};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Nominatim rifiuta le richieste senza User-Agent identificativo
pub const GEOCODER_USER_AGENT: &str = "FindSomeone-App/1.0";

// lat/lon arrivano come stringhe
#[derive(Deserialize, Debug)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(search_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url: search_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .client
            .get(&self.search_url)
            .header(USER_AGENT, GEOCODER_USER_AGENT)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Geocoder answered with status {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            debug!("No geocoding result");
            return Ok(None);
        };

        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Parse(place.lat.clone()))?;
        let lon = place
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Parse(place.lon.clone()))?;

        Ok(Some(Coordinates { lat, lon }))
    }
}
