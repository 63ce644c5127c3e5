//! Document store port
//!
//! The domain persists JSON documents addressed by slash-separated paths
//! (`games/{id}`, `conversations/{id}/messages/{id}`). Every stored document carries a
//! monotonically increasing version. Writes are submitted as a [`WriteBatch`] whose
//! preconditions pin the versions the caller observed; the store applies the whole batch
//! atomically or rejects it with [`DomainError::VersionConflict`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DomainError;

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Raw document body
pub type Document = serde_json::Value;

/// A document together with the version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDocument {
    pub path: String,
    pub version: u64,
    pub data: Document,
}

impl VersionedDocument {
    /// Deserialize the body into a domain type
    pub fn decode<T: DeserializeOwned>(&self) -> RepoResult<T> {
        decode(&self.path, &self.data)
    }

    /// Deserialize the body and fill its id from the path when the body omits it
    pub fn decode_keyed<T: DeserializeOwned + Keyed>(&self) -> RepoResult<T> {
        let mut value: T = self.decode()?;
        value.fill_id(self.id());
        Ok(value)
    }

    /// Last path segment (the document id)
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Entity whose id may live only in its document key
pub trait Keyed {
    fn fill_id(&mut self, id: &str);
}

/// Deserialize a document body, reporting the path on failure
pub fn decode<T: DeserializeOwned>(path: &str, data: &Document) -> RepoResult<T> {
    serde_json::from_value(data.clone()).map_err(|e| DomainError::CorruptDocument {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Serialize a domain value into a document body
pub fn encode<T: Serialize + ?Sized>(path: &str, value: &T) -> RepoResult<Document> {
    serde_json::to_value(value).map_err(|e| DomainError::CorruptDocument {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Version a document must be at for a batch to apply.
///
/// `expected_version: None` requires the document to be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    pub path: String,
    pub expected_version: Option<u64>,
}

/// A single write inside a batch
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set { path: String, data: Document },
    Delete { path: String },
}

impl WriteOp {
    pub fn path(&self) -> &str {
        match self {
            Self::Set { path, .. } | Self::Delete { path } => path,
        }
    }
}

/// Atomic unit of work submitted to [`DocumentStore::commit`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub preconditions: Vec<Precondition>,
    pub writes: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `path` to be at `expected_version` (or absent for `None`)
    pub fn require(&mut self, path: impl Into<String>, expected_version: Option<u64>) -> &mut Self {
        self.preconditions.push(Precondition {
            path: path.into(),
            expected_version,
        });
        self
    }

    /// Replace the document at `path`
    pub fn set(&mut self, path: impl Into<String>, data: Document) -> &mut Self {
        self.writes.push(WriteOp::Set {
            path: path.into(),
            data,
        });
        self
    }

    /// Remove the document at `path`; deleting an absent document is a no-op
    pub fn delete(&mut self, path: impl Into<String>) -> &mut Self {
        self.writes.push(WriteOp::Delete { path: path.into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Versioned document store with atomic multi-document commits
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a single document
    async fn get(&self, path: &str) -> RepoResult<Option<VersionedDocument>>;

    /// List the direct children of a collection, ordered by path
    async fn list(&self, collection: &str) -> RepoResult<Vec<VersionedDocument>>;

    /// Check every precondition, then apply every write, as one atomic step
    async fn commit(&self, batch: WriteBatch) -> RepoResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}
