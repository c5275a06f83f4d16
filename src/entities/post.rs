//! Post entity - Annuncio pubblicato da un utente

use super::enums::{AppealStatus, ModerationStatus, PostStatus, PostType, PriceType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub city: String,
    pub district: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_type: Option<PriceType>,
    pub status: PostStatus,
    pub moderation_status: ModerationStatus,
    pub moderation_score: Option<i32>,
    pub moderation_reason: Option<String>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub moderated_by: Option<Uuid>,
    pub appeal_status: Option<AppealStatus>,
    pub appeal_response: Option<String>,
    pub appeal_reviewed_at: Option<DateTime<Utc>>,
    pub appeal_reviewed_by: Option<Uuid>,
    pub is_ai_generated: bool,
    pub views: i32,
    pub phone_clicks: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub extended_count: i32,
    pub last_extended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campi di scadenza restituiti dopo un'estensione
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct PostExpiration {
    pub expires_at: Option<DateTime<Utc>>,
    pub extended_count: i32,
    pub last_extended_at: Option<DateTime<Utc>>,
}

/// Post con i dati dell'autore e della categoria, per le liste (admin, ricerca, dashboard)
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    pub author_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
}

/// Riga minimale per la sitemap
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct PostSitemapEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
