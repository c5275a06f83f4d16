//! Review DTOs

use crate::entities::{Review, ReviewWithReviewer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Debug, Default)]
pub struct ReviewsQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Serialize, Debug)]
pub struct ReviewsListDTO {
    pub reviews: Vec<ReviewWithReviewer>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewBodyDTO {
    pub reviewed_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ReviewCreatedDTO {
    pub success: bool,
    pub review: Review,
}

/// DTO per creare una nuova review (senza id)
#[derive(Debug, Clone)]
pub struct CreateReviewDTO {
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub post_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RespondReviewBodyDTO {
    pub review_id: Option<Uuid>,
    pub response: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReviewIdBodyDTO {
    pub review_id: Option<Uuid>,
}
