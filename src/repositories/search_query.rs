//! SearchQueryRepository - Storico delle ricerche per suggerimenti e sinonimi

use super::Create;
use crate::dtos::{CreateSearchQueryDTO, validation::escape_like};
use crate::entities::SearchQueryCount;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct SearchQueryRepository {
    connection_pool: PgPool,
}

impl SearchQueryRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Frasi più cercate negli ultimi `days` giorni
    pub async fn find_popular(&self, days: i32, limit: i64) -> Result<Vec<SearchQueryCount>, Error> {
        sqlx::query_as::<_, SearchQueryCount>(
            r#"
            SELECT lower(query) AS query, COUNT(*) AS count
            FROM search_queries
            WHERE created_at >= now() - make_interval(days => $1)
            GROUP BY lower(query)
            ORDER BY count DESC, query
            LIMIT $2
            "#,
        )
        .bind(days)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Frasi in crescita: più ricerche negli ultimi 7 giorni che nei 23 precedenti
    pub async fn find_trending(&self, limit: i64) -> Result<Vec<SearchQueryCount>, Error> {
        sqlx::query_as::<_, SearchQueryCount>(
            r#"
            SELECT lower(query) AS query,
                   COUNT(*) FILTER (WHERE created_at >= now() - INTERVAL '7 days') AS count
            FROM search_queries
            WHERE created_at >= now() - INTERVAL '30 days'
            GROUP BY lower(query)
            HAVING COUNT(*) FILTER (WHERE created_at >= now() - INTERVAL '7 days')
                 > COUNT(*) FILTER (WHERE created_at < now() - INTERVAL '7 days')
            ORDER BY count DESC, query
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Ricerche passate che contengono una delle varianti, più frequenti prima
    pub async fn find_matching(
        &self,
        variants: &[String],
        limit: i64,
    ) -> Result<Vec<SearchQueryCount>, Error> {
        let patterns: Vec<String> = variants
            .iter()
            .map(|v| format!("%{}%", escape_like(v)))
            .collect();
        sqlx::query_as::<_, SearchQueryCount>(
            r#"
            SELECT lower(query) AS query, COUNT(*) AS count
            FROM search_queries
            WHERE query ILIKE ANY($1)
            GROUP BY lower(query)
            ORDER BY count DESC, query
            LIMIT $2
            "#,
        )
        .bind(&patterns)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Uuid, CreateSearchQueryDTO> for SearchQueryRepository {
    async fn create(&self, data: &CreateSearchQueryDTO) -> Result<Uuid, Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO search_queries (query, user_id, clicked_result)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&data.query)
        .bind(data.user_id)
        .bind(&data.clicked_result)
        .fetch_one(&self.connection_pool)
        .await
    }
}
