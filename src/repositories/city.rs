//! CityRepository - Città per autocompletamento

use crate::entities::City;
use sqlx::{Error, PgPool};

pub struct CityRepository {
    connection_pool: PgPool,
}

impl CityRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Città popolari ordinate per popolazione
    pub async fn find_popular(&self, limit: i64) -> Result<Vec<City>, Error> {
        sqlx::query_as::<_, City>(
            r#"
            SELECT name, slug, voivodeship, popular
            FROM cities
            WHERE popular = TRUE
            ORDER BY population DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Ricerca case-insensitive su nome o slug.
    /// `escaped_query` deve avere già i caratteri speciali di LIKE con escape.
    pub async fn search(&self, escaped_query: &str, limit: i64) -> Result<Vec<City>, Error> {
        let pattern = format!("%{}%", escaped_query);
        sqlx::query_as::<_, City>(
            r#"
            SELECT name, slug, voivodeship, popular
            FROM cities
            WHERE name ILIKE $1 OR slug ILIKE $1
            ORDER BY popular DESC, population DESC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }
}
