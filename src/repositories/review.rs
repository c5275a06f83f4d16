//! ReviewRepository - Repository per le opinioni

use super::{Create, Read};
use crate::dtos::CreateReviewDTO;
use crate::entities::{Review, ReviewWithReviewer};
use sqlx::{Error, PgPool};
use uuid::Uuid;

const REVIEW_COLUMNS: &str = r#"
    r.id, r.reviewer_id, r.reviewed_id, r.post_id, r.booking_id, r.rating, r.comment,
    r.response, r.responded_at, r.created_at
"#;

pub struct ReviewRepository {
    connection_pool: PgPool,
}

impl ReviewRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Opinioni ricevute da un utente, più recenti prima
    pub async fn find_received_by(&self, user_id: &Uuid) -> Result<Vec<ReviewWithReviewer>, Error> {
        let query = format!(
            r#"
            SELECT {REVIEW_COLUMNS},
                   pr.full_name AS reviewer_name,
                   pr.avatar_url AS reviewer_avatar_url,
                   p.title AS post_title
            FROM reviews r
            LEFT JOIN profiles pr ON pr.id = r.reviewer_id
            LEFT JOIN posts p ON p.id = r.post_id
            WHERE r.reviewed_id = $1
            ORDER BY r.created_at DESC
            "#
        );
        sqlx::query_as::<_, ReviewWithReviewer>(&query)
            .bind(user_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn exists_for_booking(&self, booking_id: &Uuid) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM reviews WHERE booking_id = $1)")
            .bind(booking_id)
            .fetch_one(&self.connection_pool)
            .await
    }

    /// Salva la risposta dell'utente recensito
    pub async fn respond(&self, review_id: &Uuid, response: &str) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE reviews SET response = $2, responded_at = now() WHERE id = $1",
        )
        .bind(review_id)
        .bind(response)
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Create<Review, CreateReviewDTO> for ReviewRepository {
    async fn create(&self, data: &CreateReviewDTO) -> Result<Review, Error> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (reviewer_id, reviewed_id, post_id, booking_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, reviewer_id, reviewed_id, post_id, booking_id, rating, comment,
                      response, responded_at, created_at
            "#,
        )
        .bind(data.reviewer_id)
        .bind(data.reviewed_id)
        .bind(data.post_id)
        .bind(data.booking_id)
        .bind(data.rating)
        .bind(&data.comment)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<Review, Uuid> for ReviewRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Review>, Error> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
