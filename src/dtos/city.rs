//! City DTOs

use crate::entities::City;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Default)]
pub struct CitiesQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CitiesResponseDTO {
    pub cities: Vec<City>,
}
