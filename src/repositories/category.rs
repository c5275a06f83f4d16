//! CategoryRepository - Repository per le categorie

use super::Read;
use crate::dtos::validation::escape_like;
use crate::entities::{Category, CategoryMatch, CategoryPostCounts};
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct CategoryRepository {
    connection_pool: PgPool,
}

impl CategoryRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Tutte le categorie con i conteggi diretti dei post attivi (totali e AI).
    /// Le radici vengono prima, poi ordine di visualizzazione.
    pub async fn find_all_with_post_counts(&self) -> Result<Vec<CategoryPostCounts>, Error> {
        sqlx::query_as::<_, CategoryPostCounts>(
            r#"
            SELECT c.id, c.name, c.parent_id,
                   COUNT(p.id) AS total_posts,
                   COUNT(p.id) FILTER (WHERE p.is_ai_generated) AS ai_posts
            FROM categories c
            LEFT JOIN posts p ON p.category_id = c.id AND p.status = 'active'
            GROUP BY c.id, c.name, c.parent_id, c.display_order
            ORDER BY c.parent_id NULLS FIRST, c.display_order
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Categorie di un livello: radici se `parent_id` è None
    pub async fn find_by_parent(&self, parent_id: Option<&Uuid>) -> Result<Vec<Category>, Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, parent_id, display_order, description, created_at
            FROM categories
            WHERE parent_id IS NOT DISTINCT FROM $1
            ORDER BY display_order
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<Category>, Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, parent_id, display_order, description, created_at
            FROM categories
            ORDER BY parent_id NULLS FIRST, display_order
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Categoria per nome esatto (senza distinzione di maiuscole) o per slug
    pub async fn find_id_by_name_or_slug(&self, name: &str) -> Result<Option<Uuid>, Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM categories
            WHERE name ILIKE $1 OR slug = lower($2)
            ORDER BY parent_id NULLS FIRST
            LIMIT 1
            "#,
        )
        .bind(escape_like(name))
        .bind(name)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Categorie il cui nome o uno dei sinonimi contiene una delle varianti
    pub async fn search_matches(
        &self,
        variants: &[String],
        limit: i64,
    ) -> Result<Vec<CategoryMatch>, Error> {
        let patterns: Vec<String> = variants
            .iter()
            .map(|v| format!("%{}%", escape_like(v)))
            .collect();
        sqlx::query_as::<_, CategoryMatch>(
            r#"
            SELECT DISTINCT c.id, c.name, c.slug
            FROM categories c
            LEFT JOIN category_synonyms cs ON cs.category_id = c.id
            WHERE c.name ILIKE ANY($1) OR cs.synonym ILIKE ANY($1)
            ORDER BY c.name
            LIMIT $2
            "#,
        )
        .bind(&patterns)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Ritorna false se la categoria non esiste
    pub async fn set_description(&self, id: &Uuid, description: &str) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE categories SET description = $2 WHERE id = $1")
            .bind(id)
            .bind(description)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ritorna false se la categoria non esiste
    pub async fn set_display_order(&self, id: &Uuid, display_order: i32) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE categories SET display_order = $2 WHERE id = $1")
            .bind(id)
            .bind(display_order)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggiorna più categorie nella stessa transazione
    pub async fn set_display_orders(&self, updates: &[(Uuid, i32)]) -> Result<usize, Error> {
        let mut tx = self.connection_pool.begin().await?;
        for (id, display_order) in updates {
            sqlx::query("UPDATE categories SET display_order = $2 WHERE id = $1")
                .bind(id)
                .bind(display_order)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(updates.len())
    }
}

impl Read<Category, Uuid> for CategoryRepository {
    async fn read(&self, id: &Uuid) -> Result<Option<Category>, Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, parent_id, display_order, description, created_at
            FROM categories WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
