//! Category entity - Categoria (fino a 3 livelli tramite parent_id)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub display_order: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Categoria con i conteggi dei post attivi (totali e generati da AI)
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct CategoryPostCounts {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub total_posts: i64,
    pub ai_posts: i64,
}
