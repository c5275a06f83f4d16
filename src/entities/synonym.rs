//! Synonym entities - Sinonimi di ricerca per termini e categorie

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct SearchSynonym {
    pub id: Uuid,
    pub term: String,
    pub synonym: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct CategorySynonym {
    pub id: Uuid,
    pub category_id: Uuid,
    pub synonym: String,
    pub created_at: DateTime<Utc>,
}

/// Categoria trovata per nome o per sinonimo, per i suggerimenti di ricerca
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CategoryMatch {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}
