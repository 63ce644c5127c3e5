//! PostgreSQL implementation of DocumentStore
//!
//! Documents live in a single `documents` table as JSONB with a version drawn from a
//! shared sequence. A commit locks every precondition row with `SELECT ... FOR UPDATE`
//! (in path order), compares versions, then applies the writes inside the same
//! database transaction.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};

use gamehub_core::error::DomainError;
use gamehub_core::traits::{
    DocumentStore, RepoResult, VersionedDocument, WriteBatch, WriteOp,
};
use gamehub_core::value_objects::DocumentPath;

use super::error::{map_db_error, map_unique_violation};

const SCHEMA: &str = r"
CREATE SEQUENCE IF NOT EXISTS document_versions;

CREATE TABLE IF NOT EXISTS documents (
    path        TEXT PRIMARY KEY,
    collection  TEXT NOT NULL,
    data        JSONB NOT NULL,
    version     BIGINT NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection, path);
";

#[derive(Debug, FromRow)]
struct DocumentRow {
    path: String,
    version: i64,
    data: serde_json::Value,
}

impl From<DocumentRow> for VersionedDocument {
    fn from(row: DocumentRow) -> Self {
        Self {
            path: row.path,
            version: row.version as u64,
            data: row.data,
        }
    }
}

/// PostgreSQL implementation of DocumentStore
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new PgDocumentStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the documents table if it does not exist
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> RepoResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn collection_of(path: &str) -> RepoResult<String> {
    DocumentPath::parse(path)
        .map(|p| p.collection().to_string())
        .ok_or_else(|| DomainError::InternalError(format!("malformed document path '{path}'")))
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> RepoResult<Option<VersionedDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT path, version, data
            FROM documents
            WHERE path = $1
            ",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(VersionedDocument::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> RepoResult<Vec<VersionedDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT path, version, data
            FROM documents
            WHERE collection = $1
            ORDER BY path
            ",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(VersionedDocument::from).collect())
    }

    #[instrument(skip(self, batch), fields(preconditions = batch.preconditions.len(), writes = batch.writes.len()))]
    async fn commit(&self, batch: WriteBatch) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock in a stable order so concurrent commits cannot deadlock on each other
        let mut preconditions = batch.preconditions;
        preconditions.sort_by(|a, b| a.path.cmp(&b.path));

        let mut expect_absent = HashSet::new();
        for pre in &preconditions {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT version FROM documents WHERE path = $1 FOR UPDATE")
                    .bind(&pre.path)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

            if current.map(|v| v as u64) != pre.expected_version {
                debug!(
                    path = %pre.path,
                    expected = ?pre.expected_version,
                    actual = ?current,
                    "Precondition failed"
                );
                return Err(DomainError::VersionConflict {
                    path: pre.path.clone(),
                });
            }
            if pre.expected_version.is_none() {
                expect_absent.insert(pre.path.as_str());
            }
        }

        for write in &batch.writes {
            match write {
                WriteOp::Set { path, data } if expect_absent.remove(path.as_str()) => {
                    // Another transaction may insert the row after our check; the
                    // primary key turns that race into a conflict.
                    sqlx::query(
                        r"
                        INSERT INTO documents (path, collection, data, version)
                        VALUES ($1, $2, $3, nextval('document_versions'))
                        ",
                    )
                    .bind(path)
                    .bind(collection_of(path)?)
                    .bind(data)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        map_unique_violation(e, || DomainError::VersionConflict {
                            path: path.clone(),
                        })
                    })?;
                }
                WriteOp::Set { path, data } => {
                    sqlx::query(
                        r"
                        INSERT INTO documents (path, collection, data, version)
                        VALUES ($1, $2, $3, nextval('document_versions'))
                        ON CONFLICT (path) DO UPDATE
                        SET data = EXCLUDED.data,
                            version = EXCLUDED.version,
                            updated_at = NOW()
                        ",
                    )
                    .bind(path)
                    .bind(collection_of(path)?)
                    .bind(data)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
                }
                WriteOp::Delete { path } => {
                    sqlx::query("DELETE FROM documents WHERE path = $1")
                        .bind(path)
                        .execute(&mut *tx)
                        .await
                        .map_err(map_db_error)?;
                }
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
