//! Review entity - Opinione lasciata da un utente su un altro

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub post_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Review con nome dell'autore e titolo del post, per la pagina profilo
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ReviewWithReviewer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub reviewer_name: Option<String>,
    pub reviewer_avatar_url: Option<String>,
    pub post_title: Option<String>,
}
