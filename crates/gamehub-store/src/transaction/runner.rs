//! Optimistic transaction runner
//!
//! A [`Transaction`] records the version of every document it reads and buffers every
//! write. On commit the reads become preconditions of one [`WriteBatch`], so the batch
//! only applies if nothing the body looked at has changed. [`run_transaction`] re-runs
//! the body on conflict with exponential backoff until the attempt budget runs out.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use gamehub_common::TransactionSettings;
use gamehub_core::error::DomainError;
use gamehub_core::traits::{
    decode, encode, Document, DocumentStore, Keyed, RepoResult, VersionedDocument,
    WriteBatch,
};

/// Retry budget for [`run_transaction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(250),
        }
    }
}

impl From<TransactionSettings> for TransactionConfig {
    fn from(settings: TransactionSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_backoff: Duration::from_millis(settings.base_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
        }
    }
}

impl TransactionConfig {
    /// Upper bound of the pause after `attempt` failed attempts
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Jittered pause in `[ceiling / 2, ceiling]`
    fn backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff_ceiling(attempt);
        let half = ceiling / 2;
        let jitter_ms = u64::try_from(half.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return ceiling;
        }
        half + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// Read-set and write buffer of one transaction attempt
pub struct Transaction<'s> {
    store: &'s dyn DocumentStore,
    /// Path to the version observed on first read, `None` for absent documents
    reads: HashMap<String, Option<VersionedDocument>>,
    staged: HashMap<String, Option<Document>>,
    batch: WriteBatch,
}

impl<'s> Transaction<'s> {
    fn new(store: &'s dyn DocumentStore) -> Self {
        Self {
            store,
            reads: HashMap::new(),
            staged: HashMap::new(),
            batch: WriteBatch::new(),
        }
    }

    /// Read a document, recording its version.
    ///
    /// Repeated reads return the first snapshot; reads after a write in the same
    /// transaction see the staged value.
    pub async fn get(&mut self, path: &str) -> RepoResult<Option<VersionedDocument>> {
        if let Some(staged) = self.staged.get(path) {
            let version = self
                .reads
                .get(path)
                .and_then(|r| r.as_ref().map(|d| d.version))
                .unwrap_or_default();
            return Ok(staged.clone().map(|data| VersionedDocument {
                path: path.to_string(),
                version,
                data,
            }));
        }
        if let Some(read) = self.reads.get(path) {
            return Ok(read.clone());
        }

        let doc = self.store.get(path).await?;
        self.reads.insert(path.to_string(), doc.clone());
        Ok(doc)
    }

    /// Read and decode a document
    pub async fn get_as<T: DeserializeOwned>(&mut self, path: &str) -> RepoResult<Option<T>> {
        match self.get(path).await? {
            Some(doc) => doc.decode().map(Some),
            None => Ok(None),
        }
    }

    /// Read and decode a document, filling its id from the path
    pub async fn get_keyed<T: DeserializeOwned + Keyed>(
        &mut self,
        path: &str,
    ) -> RepoResult<Option<T>> {
        match self.get(path).await? {
            Some(doc) => doc.decode_keyed().map(Some),
            None => Ok(None),
        }
    }

    /// Read every document in a collection.
    ///
    /// Each listed document joins the read set; documents added to the collection
    /// concurrently are not detected.
    pub async fn list(&mut self, collection: &str) -> RepoResult<Vec<VersionedDocument>> {
        let docs = self.store.list(collection).await?;
        for doc in &docs {
            self.reads
                .entry(doc.path.clone())
                .or_insert_with(|| Some(doc.clone()));
        }
        Ok(docs)
    }

    /// Stage a write of `value` at `path`
    pub fn set<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) -> RepoResult<()> {
        let data = encode(path, value)?;
        self.staged.insert(path.to_string(), Some(data.clone()));
        self.batch.set(path, data);
        Ok(())
    }

    /// Stage a deletion of `path`
    pub fn delete(&mut self, path: &str) {
        self.staged.insert(path.to_string(), None);
        self.batch.delete(path);
    }

    /// Whether any write has been staged
    pub fn has_writes(&self) -> bool {
        !self.batch.is_empty()
    }

    fn into_batch(self) -> WriteBatch {
        let mut batch = self.batch;
        for (path, read) in self.reads {
            batch.require(path, read.map(|d| d.version));
        }
        batch
    }
}

/// Run `body` as an optimistic transaction against `store`.
///
/// The body may run several times and must not have side effects outside the
/// transaction. Any retryable conflict, whether raised by the body or by the commit,
/// re-runs it after a backoff. When `max_attempts` runs out the result is
/// [`DomainError::TransactionConflict`].
pub async fn run_transaction<'s, T, F>(
    store: &'s dyn DocumentStore,
    config: &TransactionConfig,
    mut body: F,
) -> RepoResult<T>
where
    T: Send,
    F: for<'t> FnMut(&'t mut Transaction<'s>) -> BoxFuture<'t, RepoResult<T>> + Send,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let mut tx = Transaction::new(store);
        let outcome = body(&mut tx).await;
        let result = match outcome {
            Ok(value) if tx.has_writes() => store.commit(tx.into_batch()).await.map(|()| value),
            other => other,
        };

        match result {
            Err(err) if err.is_retryable() => {
                if attempt >= max_attempts {
                    warn!(attempts = attempt, error = %err, "Transaction retry budget exhausted");
                    return Err(DomainError::TransactionConflict { attempts: attempt });
                }
                let pause = config.backoff(attempt);
                debug!(attempt, pause_ms = pause.as_millis() as u64, error = %err, "Retrying transaction");
                tokio::time::sleep(pause).await;
            }
            other => return other,
        }
    }
}
