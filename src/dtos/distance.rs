//! Distance DTOs

use serde::{Deserialize, Serialize};

/// Campi opzionali: la validazione produce il 400 "Missing required parameters"
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRequestDTO {
    pub user_lat: Option<f64>,
    pub user_lon: Option<f64>,
    pub post_city: Option<String>,
    pub post_district: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DistanceResponseDTO {
    pub distance: f64,
}
