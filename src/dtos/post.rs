//! Post DTOs - lista pubblica, creazione, estensione, contatori e moderazione

use crate::entities::{
    AppealStatus, ModerationStatus, Post, PostExpiration, PostStatus, PostType, PostWithAuthor,
    PriceType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Ordinamento della lista pubblica degli annunci
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

/// Query parameters di GET /api/posts
#[derive(Deserialize, Debug, Default)]
pub struct PostsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub sort: Option<ListingSort>,
}

/// Filtri già risolti passati al repository
#[derive(Debug, Clone, Default)]
pub struct ListingFilterDTO {
    /// Un gruppo per termine cercato: il post deve soddisfare ogni gruppo
    /// con almeno una delle varianti (termine o sinonimo)
    pub term_groups: Vec<Vec<String>>,
    pub city: Option<String>,
    pub category_id: Option<Uuid>,
    pub post_type: Option<PostType>,
    pub sort: ListingSort,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListingDTO {
    pub posts: Vec<PostWithAuthor>,
    pub has_more: bool,
    pub total: i64,
}

/// Query parameters di GET /api/my-posts
#[derive(Deserialize, Debug, Default)]
pub struct MyPostsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize, Debug)]
pub struct MyPostsDTO {
    pub posts: Vec<PostWithAuthor>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBodyDTO {
    #[validate(length(min = 1, max = 150, message = "Title must be between 1 and 150 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    pub district: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_type: Option<PriceType>,
}

/// DTO per creare un nuovo post (senza id), sempre in attesa di moderazione
#[derive(Debug, Clone)]
pub struct CreatePostDTO {
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub post_type: PostType,
    pub city: String,
    pub district: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_type: Option<PriceType>,
}

#[derive(Serialize, Debug)]
pub struct PostCreatedDTO {
    pub success: bool,
    pub post: Post,
    pub moderation: ModerationRunDTO,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModerateBodyDTO {
    pub post_id: Option<Uuid>,
}

/// Esito della moderazione automatica
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModerationRunDTO {
    pub success: bool,
    pub status: &'static str,
    pub score: i32,
    pub reasons: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct ExtendPostResponseDTO {
    pub success: bool,
    pub message: &'static str,
    pub data: PostExpiration,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ViewCountedDTO {
    pub counted: bool,
}

/// Query parameters della lista di moderazione
#[derive(Deserialize, Debug, Default)]
pub struct ModerationQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDTO {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationDTO {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ModerationListDTO {
    pub posts: Vec<PostWithAuthor>,
    pub pagination: PaginationDTO,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModerationActionBodyDTO {
    pub action: String,
    pub reason: Option<String>,
    pub appeal_response: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModerationActionResultDTO {
    pub success: bool,
    pub action: &'static str,
    pub new_status: &'static str,
}

/// Aggiornamento di moderazione applicato dal repository (solo i campi `Some` cambiano)
#[derive(Debug, Clone, Default)]
pub struct UpdateModerationDTO {
    pub status: Option<PostStatus>,
    pub moderation_status: Option<ModerationStatus>,
    pub moderation_score: Option<i32>,
    pub moderation_reason: Option<Option<String>>,
    pub moderated_by: Option<Uuid>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub appeal_status: Option<AppealStatus>,
    pub appeal_response: Option<String>,
    pub appeal_reviewed_by: Option<Uuid>,
    pub appeal_reviewed_at: Option<DateTime<Utc>>,
}

/// Riga da inserire in `moderation_logs`
#[derive(Debug, Clone)]
pub struct CreateModerationLogDTO {
    pub post_id: Uuid,
    pub admin_id: Option<Uuid>,
    pub action: &'static str,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub reason: Option<String>,
}
