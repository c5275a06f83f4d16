//! PostRepository - Repository per gli annunci

use super::{Create, Delete, Read, Update};
use crate::dtos::{CreatePostDTO, ListingFilterDTO, ListingSort, UpdateModerationDTO, validation::escape_like};
use crate::entities::{
    AppealStatus, ModerationStatus, Post, PostExpiration, PostSitemapEntry, PostStatus,
    PostWithAuthor,
};
use sqlx::{Error, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const POST_COLUMNS: &str = r#"
    p.id, p.user_id, p.category_id, p.title, p.description, p.type, p.city, p.district,
    p.price_min, p.price_max, p.price_type,
    p.status, p.moderation_status, p.moderation_score, p.moderation_reason,
    p.moderated_at, p.moderated_by,
    p.appeal_status, p.appeal_response, p.appeal_reviewed_at, p.appeal_reviewed_by,
    p.is_ai_generated, p.views, p.phone_clicks, p.expires_at, p.extended_count,
    p.last_extended_at, p.created_at, p.updated_at
"#;

const AUTHOR_COLUMNS_AND_JOINS: &str = r#"
    pr.full_name AS author_name,
    pr.avatar_url AS author_avatar_url,
    c.name AS category_name,
    c.slug AS category_slug
    FROM posts p
    LEFT JOIN profiles pr ON pr.id = p.user_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Filtro della coda di moderazione
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModerationFilter {
    /// Post con un dato stato di moderazione
    Status(ModerationStatus),
    /// Post rifiutati con un ricorso ancora aperto
    Appeals,
}

pub struct PostRepository {
    connection_pool: PgPool,
}

impl PostRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Estende la scadenza di 30 giorni (stored procedure) e rilegge i campi aggiornati
    pub async fn extend_expiration(&self, post_id: &Uuid) -> Result<PostExpiration, Error> {
        sqlx::query("SELECT extend_post_expiration($1)")
            .bind(post_id)
            .execute(&self.connection_pool)
            .await?;

        sqlx::query_as::<_, PostExpiration>(
            "SELECT expires_at, extended_count, last_extended_at FROM posts WHERE id = $1",
        )
        .bind(post_id)
        .fetch_one(&self.connection_pool)
        .await
    }

    pub async fn increment_phone_clicks(&self, post_id: &Uuid) -> Result<(), Error> {
        sqlx::query("SELECT increment_phone_clicks($1)")
            .bind(post_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }

    pub async fn increment_views(&self, post_id: &Uuid) -> Result<(), Error> {
        sqlx::query("SELECT increment_post_views($1)")
            .bind(post_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }

    /// Id dell'autore, senza caricare l'intero post
    pub async fn find_author(&self, post_id: &Uuid) -> Result<Option<Uuid>, Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Pagina della coda di moderazione (più recenti prima) e totale per la paginazione
    pub async fn find_for_moderation(
        &self,
        filter: ModerationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostWithAuthor>, i64), Error> {
        let mut page_query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS}, {AUTHOR_COLUMNS_AND_JOINS}"));
        push_moderation_filter(&mut page_query, filter);
        page_query
            .push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let posts = page_query
            .build_query_as::<PostWithAuthor>()
            .fetch_all(&self.connection_pool)
            .await?;

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        push_moderation_filter(&mut count_query, filter);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.connection_pool)
            .await?;

        Ok((posts, total))
    }

    /// Lista pubblica: solo post attivi, filtri opzionali, totale per `hasMore`
    pub async fn find_listing(
        &self,
        filter: &ListingFilterDTO,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostWithAuthor>, i64), Error> {
        let mut page_query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS}, {AUTHOR_COLUMNS_AND_JOINS}"));
        push_listing_filter(&mut page_query, filter);
        page_query.push(match filter.sort {
            ListingSort::Newest => " ORDER BY p.created_at DESC",
            ListingSort::Oldest => " ORDER BY p.created_at ASC",
            ListingSort::PriceAsc => " ORDER BY p.price_min ASC NULLS LAST, p.created_at DESC",
            ListingSort::PriceDesc => " ORDER BY p.price_min DESC NULLS LAST, p.created_at DESC",
        });
        page_query
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let posts = page_query
            .build_query_as::<PostWithAuthor>()
            .fetch_all(&self.connection_pool)
            .await?;

        let mut count_query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM posts p LEFT JOIN categories c ON c.id = p.category_id",
        );
        push_listing_filter(&mut count_query, filter);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.connection_pool)
            .await?;

        Ok((posts, total))
    }

    /// Post dell'utente per la dashboard, qualsiasi stato, più recenti prima
    pub async fn find_by_owner(
        &self,
        user_id: &Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, Error> {
        let query = format!(
            r#"
            SELECT {POST_COLUMNS}, {AUTHOR_COLUMNS_AND_JOINS}
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Titoli dei post attivi che contengono una delle varianti, per i suggerimenti
    pub async fn find_matching_titles(
        &self,
        variants: &[String],
        limit: i64,
    ) -> Result<Vec<String>, Error> {
        let patterns: Vec<String> = variants
            .iter()
            .map(|v| format!("%{}%", escape_like(v)))
            .collect();
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT title FROM posts
            WHERE status = 'active'
              AND (title ILIKE ANY($1) OR description ILIKE ANY($1))
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(&patterns)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn count_ai_generated(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE is_ai_generated = TRUE")
            .fetch_one(&self.connection_pool)
            .await
    }

    pub async fn delete_ai_generated(&self) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM posts WHERE is_ai_generated = TRUE")
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_ai_generated_in_categories(
        &self,
        category_ids: &[Uuid],
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            "DELETE FROM posts WHERE is_ai_generated = TRUE AND category_id = ANY($1)",
        )
        .bind(category_ids)
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Chiude i post scaduti (stored procedure) e conta quelli chiusi nell'ultimo minuto
    pub async fn expire_old_posts(&self) -> Result<i64, Error> {
        sqlx::query("SELECT expire_old_posts()")
            .execute(&self.connection_pool)
            .await?;

        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM posts
            WHERE status = 'closed' AND updated_at >= now() - INTERVAL '1 minute'
            "#,
        )
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Post attivi e approvati, per la sitemap
    pub async fn find_for_sitemap(&self, limit: i64) -> Result<Vec<PostSitemapEntry>, Error> {
        sqlx::query_as::<_, PostSitemapEntry>(
            r#"
            SELECT id, created_at, updated_at FROM posts
            WHERE status = 'active' AND moderation_status = 'approved'
            ORDER BY updated_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }
}

fn push_moderation_filter(query: &mut QueryBuilder<Postgres>, filter: ModerationFilter) {
    match filter {
        ModerationFilter::Status(status) => {
            query.push(" WHERE p.moderation_status = ").push_bind(status);
        }
        ModerationFilter::Appeals => {
            query
                .push(" WHERE p.moderation_status = ")
                .push_bind(ModerationStatus::Rejected)
                .push(" AND p.appeal_status IN (")
                .push_bind(AppealStatus::Pending)
                .push(", ")
                .push_bind(AppealStatus::Reviewing)
                .push(")");
        }
    }
}

fn push_listing_filter(query: &mut QueryBuilder<Postgres>, filter: &ListingFilterDTO) {
    query.push(" WHERE p.status = ").push_bind(PostStatus::Active);

    if let Some(city) = &filter.city {
        let pattern = format!("%{}%", escape_like(city));
        query
            .push(" AND (p.city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.district ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category_id) = filter.category_id {
        query.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(post_type) = filter.post_type {
        query.push(" AND p.type = ").push_bind(post_type);
    }

    // AND tra i termini, OR tra le varianti di un termine
    for group in filter.term_groups.iter().filter(|g| !g.is_empty()) {
        let patterns: Vec<String> = group
            .iter()
            .map(|variant| format!("%{}%", escape_like(variant)))
            .collect();
        query
            .push(" AND (p.title ILIKE ANY(")
            .push_bind(patterns.clone())
            .push(") OR p.description ILIKE ANY(")
            .push_bind(patterns.clone())
            .push(") OR c.name ILIKE ANY(")
            .push_bind(patterns.clone())
            .push(") OR p.category_id IN (SELECT category_id FROM category_synonyms WHERE synonym ILIKE ANY(")
            .push_bind(patterns)
            .push(")))");
    }
}

impl Create<Post, CreatePostDTO> for PostRepository {
    async fn create(&self, data: &CreatePostDTO) -> Result<Post, Error> {
        let query = format!(
            r#"
            INSERT INTO posts AS p (user_id, category_id, title, description, type, city, district,
                                      price_min, price_max, price_type, status, moderation_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', 'checking')
            RETURNING {POST_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(data.user_id)
            .bind(data.category_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.post_type)
            .bind(&data.city)
            .bind(&data.district)
            .bind(data.price_min)
            .bind(data.price_max)
            .bind(data.price_type)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Read<Post, Uuid> for PostRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Post>, Error> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Post, UpdateModerationDTO, Uuid> for PostRepository {
    async fn update(&self, id: &Uuid, data: &UpdateModerationDTO) -> Result<Post, Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE posts p SET updated_at = now()");

        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }
        if let Some(moderation_status) = data.moderation_status {
            query.push(", moderation_status = ").push_bind(moderation_status);
        }
        if let Some(score) = data.moderation_score {
            query.push(", moderation_score = ").push_bind(score);
        }
        // Some(None) azzera il motivo
        if let Some(reason) = &data.moderation_reason {
            query.push(", moderation_reason = ").push_bind(reason.clone());
        }
        if let Some(moderated_by) = data.moderated_by {
            query.push(", moderated_by = ").push_bind(moderated_by);
        }
        if let Some(moderated_at) = data.moderated_at {
            query.push(", moderated_at = ").push_bind(moderated_at);
        }
        if let Some(appeal_status) = data.appeal_status {
            query.push(", appeal_status = ").push_bind(appeal_status);
        }
        if let Some(appeal_response) = &data.appeal_response {
            query.push(", appeal_response = ").push_bind(appeal_response.clone());
        }
        if let Some(reviewed_by) = data.appeal_reviewed_by {
            query.push(", appeal_reviewed_by = ").push_bind(reviewed_by);
        }
        if let Some(reviewed_at) = data.appeal_reviewed_at {
            query.push(", appeal_reviewed_at = ").push_bind(reviewed_at);
        }

        query
            .push(" WHERE p.id = ")
            .push_bind(*id)
            .push(format!(" RETURNING {POST_COLUMNS}"));

        query
            .build_query_as::<Post>()
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Delete<Uuid> for PostRepository {
    async fn delete(&self, id: &Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
