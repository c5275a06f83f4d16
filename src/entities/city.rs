//! City entity - Città usate per autocompletamento e filtri

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct City {
    pub name: String,
    pub slug: String,
    pub voivodeship: Option<String>,
    pub popular: bool,
}
