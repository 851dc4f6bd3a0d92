//! PostgreSQL document store.
//!
//! Documents live in a single `documents` table as JSONB, keyed by
//! database and collection name. A session owns one pooled connection.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use super::{DocumentStore, Filter, FindOptions, Namespace, SortOrder, StoreError, StoreSession};
use crate::entities::DocumentEntity;

/// [`DocumentStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to acquire store connection");
                StoreError::Unavailable(e.to_string())
            })?;
        Ok(Box::new(PgStoreSession { conn }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Session holding a pooled connection; the connection returns to the pool on drop.
pub struct PgStoreSession {
    conn: PoolConnection<Postgres>,
}

/// Splits a filter into the `(path, value)` bind pair; `All` binds NULLs.
fn filter_binds(filter: &Filter) -> (Option<Vec<String>>, Option<Value>) {
    match filter {
        Filter::All => (None, None),
        Filter::Eq { path, value } => (Some(path.clone()), Some(value.clone())),
    }
}

#[async_trait]
impl StoreSession for PgStoreSession {
    async fn insert_one(
        &mut self,
        namespace: &Namespace,
        body: Value,
    ) -> Result<DocumentEntity, StoreError> {
        let entity = sqlx::query_as::<_, DocumentEntity>(
            r#"
            INSERT INTO documents (database_name, collection_name, body)
            VALUES ($1, $2, $3)
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(&namespace.database)
        .bind(&namespace.collection)
        .bind(body)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(entity)
    }

    async fn find(
        &mut self,
        namespace: &Namespace,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<DocumentEntity>, StoreError> {
        let (path, value) = filter_binds(filter);

        let sql = match options.sort {
            SortOrder::OldestFirst => {
                r#"
                SELECT id, body, created_at, updated_at
                FROM documents
                WHERE database_name = $1 AND collection_name = $2
                  AND ($3::text[] IS NULL OR body #> $3::text[] = $4::jsonb)
                ORDER BY seq ASC
                LIMIT $5
                "#
            }
            SortOrder::NewestFirst => {
                r#"
                SELECT id, body, created_at, updated_at
                FROM documents
                WHERE database_name = $1 AND collection_name = $2
                  AND ($3::text[] IS NULL OR body #> $3::text[] = $4::jsonb)
                ORDER BY seq DESC
                LIMIT $5
                "#
            }
        };

        let entities = sqlx::query_as::<_, DocumentEntity>(sql)
            .bind(&namespace.database)
            .bind(&namespace.collection)
            .bind(path)
            .bind(value)
            .bind(options.limit)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(entities)
    }

    async fn replace_one(
        &mut self,
        namespace: &Namespace,
        filter: &Filter,
        body: Value,
    ) -> Result<Option<DocumentEntity>, StoreError> {
        let (path, value) = filter_binds(filter);

        let entity = sqlx::query_as::<_, DocumentEntity>(
            r#"
            UPDATE documents
            SET body = $5, updated_at = NOW()
            WHERE id = (
                SELECT id
                FROM documents
                WHERE database_name = $1 AND collection_name = $2
                  AND ($3::text[] IS NULL OR body #> $3::text[] = $4::jsonb)
                ORDER BY seq ASC
                LIMIT 1
            )
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(&namespace.database)
        .bind(&namespace.collection)
        .bind(path)
        .bind(value)
        .bind(body)
        .fetch_optional(&mut *self.conn)
        .await?;

        if entity.is_none() {
            tracing::debug!(
                collection = %namespace.collection,
                "replace_one matched no document"
            );
        }

        Ok(entity)
    }
}
