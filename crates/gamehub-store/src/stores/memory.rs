//! In-process implementation of DocumentStore

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use gamehub_core::error::DomainError;
use gamehub_core::traits::{
    Document, DocumentStore, RepoResult, VersionedDocument, WriteBatch, WriteOp,
};

use super::is_child_of;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// What happened to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Deleted,
}

/// Notification emitted for every committed write
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub path: String,
    pub kind: ChangeKind,
    /// New version, `None` for deletions
    pub version: Option<u64>,
    pub data: Option<Document>,
}

#[derive(Debug)]
struct Entry {
    version: u64,
    data: Document,
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<String, Entry>,
    /// Store-wide version counter; a recreated document never reuses a version
    clock: u64,
}

/// Versioned document store held in memory
///
/// Commits take a single write lock, so every batch is applied atomically and
/// preconditions are checked against a consistent view.
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
    changes: broadcast::Sender<DocumentChange>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(Inner::default()),
            changes,
        }
    }

    /// Subscribe to committed changes
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.changes.subscribe()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.inner.read().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &str) -> RepoResult<Option<VersionedDocument>> {
        let inner = self.inner.read();
        Ok(inner.docs.get(path).map(|entry| VersionedDocument {
            path: path.to_string(),
            version: entry.version,
            data: entry.data.clone(),
        }))
    }

    async fn list(&self, collection: &str) -> RepoResult<Vec<VersionedDocument>> {
        let prefix = format!("{collection}/");
        let inner = self.inner.read();
        Ok(inner
            .docs
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter(|(path, _)| is_child_of(path, collection))
            .map(|(path, entry)| VersionedDocument {
                path: path.clone(),
                version: entry.version,
                data: entry.data.clone(),
            })
            .collect())
    }

    #[instrument(skip(self, batch), fields(preconditions = batch.preconditions.len(), writes = batch.writes.len()))]
    async fn commit(&self, batch: WriteBatch) -> RepoResult<()> {
        let mut changes = Vec::with_capacity(batch.writes.len());
        {
            let mut inner = self.inner.write();

            for pre in &batch.preconditions {
                let current = inner.docs.get(&pre.path).map(|e| e.version);
                if current != pre.expected_version {
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
            }

            for write in batch.writes {
                match write {
                    WriteOp::Set { path, data } => {
                        inner.clock += 1;
                        let version = inner.clock;
                        inner.docs.insert(
                            path.clone(),
                            Entry {
                                version,
                                data: data.clone(),
                            },
                        );
                        changes.push(DocumentChange {
                            path,
                            kind: ChangeKind::Set,
                            version: Some(version),
                            data: Some(data),
                        });
                    }
                    WriteOp::Delete { path } => {
                        if inner.docs.remove(&path).is_some() {
                            changes.push(DocumentChange {
                                path,
                                kind: ChangeKind::Deleted,
                                version: None,
                                data: None,
                            });
                        }
                    }
                }
            }
        }

        for change in changes {
            // No subscribers is not an error
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
