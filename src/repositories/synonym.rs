//! Repository per i sinonimi di ricerca e di categoria

use super::{Create, Delete};
use crate::dtos::{CreateCategorySynonymDTO, CreateSynonymDTO, validation::escape_like};
use crate::entities::{CategorySynonym, SearchSynonym};
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct SynonymRepository {
    connection_pool: PgPool,
}

impl SynonymRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_all(&self) -> Result<Vec<SearchSynonym>, Error> {
        sqlx::query_as::<_, SearchSynonym>(
            "SELECT id, term, synonym, created_at FROM search_synonyms ORDER BY term, synonym",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Coppie in cui uno dei termini (minuscoli) compare come termine o come sinonimo
    pub async fn find_related(&self, terms: &[String]) -> Result<Vec<SearchSynonym>, Error> {
        sqlx::query_as::<_, SearchSynonym>(
            r#"
            SELECT id, term, synonym, created_at FROM search_synonyms
            WHERE lower(term) = ANY($1) OR lower(synonym) = ANY($1)
            ORDER BY term, synonym
            "#,
        )
        .bind(terms)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Inserimento in blocco in transazione, le coppie già presenti vengono saltate
    pub async fn create_many(&self, pairs: &[CreateSynonymDTO]) -> Result<Vec<SearchSynonym>, Error> {
        let mut tx = self.connection_pool.begin().await?;
        let mut inserted = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let row = sqlx::query_as::<_, SearchSynonym>(
                r#"
                INSERT INTO search_synonyms (term, synonym)
                VALUES ($1, $2)
                ON CONFLICT (term, synonym) DO NOTHING
                RETURNING id, term, synonym, created_at
                "#,
            )
            .bind(&pair.term)
            .bind(&pair.synonym)
            .fetch_optional(&mut *tx)
            .await?;
            inserted.extend(row);
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

impl Create<SearchSynonym, CreateSynonymDTO> for SynonymRepository {
    async fn create(&self, data: &CreateSynonymDTO) -> Result<SearchSynonym, Error> {
        sqlx::query_as::<_, SearchSynonym>(
            r#"
            INSERT INTO search_synonyms (term, synonym)
            VALUES ($1, $2)
            RETURNING id, term, synonym, created_at
            "#,
        )
        .bind(&data.term)
        .bind(&data.synonym)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Delete<Uuid> for SynonymRepository {
    async fn delete(&self, id: &Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM search_synonyms WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct CategorySynonymRepository {
    connection_pool: PgPool,
}

impl CategorySynonymRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    /// Sinonimi di una categoria, oppure tutti se `category_id` è None
    pub async fn find_by_category(
        &self,
        category_id: Option<&Uuid>,
    ) -> Result<Vec<CategorySynonym>, Error> {
        sqlx::query_as::<_, CategorySynonym>(
            r#"
            SELECT id, category_id, synonym, created_at
            FROM category_synonyms
            WHERE $1::uuid IS NULL OR category_id = $1
            ORDER BY synonym
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Prima categoria con un sinonimo uguale (senza distinzione di maiuscole)
    pub async fn find_category_by_synonym(&self, synonym: &str) -> Result<Option<Uuid>, Error> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT category_id FROM category_synonyms WHERE synonym ILIKE $1 ORDER BY created_at LIMIT 1",
        )
        .bind(escape_like(synonym))
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Inserimento in blocco in transazione, le coppie già presenti vengono saltate
    pub async fn create_many(
        &self,
        pairs: &[CreateCategorySynonymDTO],
    ) -> Result<Vec<CategorySynonym>, Error> {
        let mut tx = self.connection_pool.begin().await?;
        let mut inserted = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let row = sqlx::query_as::<_, CategorySynonym>(
                r#"
                INSERT INTO category_synonyms (category_id, synonym)
                VALUES ($1, $2)
                ON CONFLICT (category_id, synonym) DO NOTHING
                RETURNING id, category_id, synonym, created_at
                "#,
            )
            .bind(pair.category_id)
            .bind(&pair.synonym)
            .fetch_optional(&mut *tx)
            .await?;
            inserted.extend(row);
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

impl Create<CategorySynonym, CreateCategorySynonymDTO> for CategorySynonymRepository {
    async fn create(&self, data: &CreateCategorySynonymDTO) -> Result<CategorySynonym, Error> {
        sqlx::query_as::<_, CategorySynonym>(
            r#"
            INSERT INTO category_synonyms (category_id, synonym)
            VALUES ($1, $2)
            RETURNING id, category_id, synonym, created_at
            "#,
        )
        .bind(data.category_id)
        .bind(&data.synonym)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Delete<Uuid> for CategorySynonymRepository {
    async fn delete(&self, id: &Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM category_synonyms WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
