//! Service context - dependency container for services
//!
//! Holds the document store, the transaction retry budget, and id generation.

use std::sync::Arc;

use futures::future::BoxFuture;
use uuid::Uuid;

use gamehub_core::entities::{UserProfile, ANONYMOUS_NAME};
use gamehub_core::traits::{DocumentStore, RepoResult};
use gamehub_core::value_objects::DocumentPath;
use gamehub_store::{run_transaction, Transaction, TransactionConfig};

use super::error::{ServiceError, ServiceResult};

/// Identity of the user making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    /// Display name supplied by the authentication layer, if any
    pub name: Option<String>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the stored profile and then to a placeholder
    pub(crate) async fn display_name(&self, tx: &mut Transaction<'_>) -> RepoResult<String> {
        if let Some(name) = self.name.as_ref().filter(|n| !n.trim().is_empty()) {
            return Ok(name.clone());
        }
        let path = DocumentPath::user(&self.user_id).to_string();
        Ok(tx
            .get_as::<UserProfile>(&path)
            .await?
            .map(|p| p.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string()))
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn DocumentStore>,
    tx_config: TransactionConfig,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(store: Arc<dyn DocumentStore>, tx_config: TransactionConfig) -> Self {
        Self { store, tx_config }
    }

    /// Get the document store
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Get the transaction retry budget
    pub fn tx_config(&self) -> &TransactionConfig {
        &self.tx_config
    }

    /// Generate a new document id
    pub fn generate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Run `body` as an optimistic transaction with the configured retry budget
    pub async fn transaction<'s, T, F>(&'s self, body: F) -> ServiceResult<T>
    where
        T: Send,
        F: for<'t> FnMut(&'t mut Transaction<'s>) -> BoxFuture<'t, RepoResult<T>> + Send,
    {
        run_transaction(self.store(), &self.tx_config, body)
            .await
            .map_err(ServiceError::from)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn DocumentStore")
            .field("tx_config", &self.tx_config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    tx_config: Option<TransactionConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn tx_config(mut self, config: TransactionConfig) -> Self {
        self.tx_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the store is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::misconfigured("store is required"))?,
            self.tx_config.unwrap_or_default(),
        ))
    }
}
