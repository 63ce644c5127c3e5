//! Pin service
//!
//! Each chat scope has at most one pinned message, stored as a pointer document
//! holding a snapshot of the message.

use tracing::{info, instrument};

use gamehub_core::entities::PinnedMessage;
use gamehub_core::value_objects::ChatScope;

use super::context::{Caller, ServiceContext};
use super::error::ServiceResult;
use super::message::{load_message, require_access};

/// Pin service
pub struct PinService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PinService<'a> {
    /// Create a new PinService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Pin a message, replacing any earlier pin in the scope.
    ///
    /// The message is read in the same transaction so the snapshot is current.
    #[instrument(skip(self, scope), fields(scope = %scope, user_id = %caller.user_id))]
    pub async fn pin_message(
        &self,
        scope: &ChatScope,
        message_id: &str,
        caller: &Caller,
    ) -> ServiceResult<PinnedMessage> {
        require_access(scope, &caller.user_id)?;

        let scope_owned = scope.clone();
        let message_id_owned = message_id.to_string();
        let caller_owned = caller.clone();

        let pin = self
            .ctx
            .transaction(move |tx| {
                let scope = scope_owned.clone();
                let message_id = message_id_owned.clone();
                let caller = caller_owned.clone();
                Box::pin(async move {
                    let path = scope.message_path(&message_id).to_string();
                    let message = load_message(tx, &path, &message_id).await?;
                    let pinned_by = caller.display_name(tx).await?;

                    let pin = PinnedMessage::new(message, pinned_by, caller.user_id.clone());
                    tx.set(&scope.pin_path().to_string(), &pin)?;
                    Ok(pin)
                })
            })
            .await?;

        info!(message_id = %message_id, "Message pinned");
        Ok(pin)
    }

    /// Remove the scope's pin. Returns `false` when nothing was pinned.
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn unpin_message(&self, scope: &ChatScope, user_id: &str) -> ServiceResult<bool> {
        require_access(scope, user_id)?;

        let pin_path = scope.pin_path().to_string();
        let removed = self
            .ctx
            .transaction(move |tx| {
                let pin_path = pin_path.clone();
                Box::pin(async move {
                    if tx.get(&pin_path).await?.is_none() {
                        return Ok(false);
                    }
                    tx.delete(&pin_path);
                    Ok(true)
                })
            })
            .await?;

        if removed {
            info!(user_id = %user_id, "Message unpinned");
        }
        Ok(removed)
    }

    /// The scope's current pin, if any
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn get_pinned(
        &self,
        scope: &ChatScope,
        user_id: &str,
    ) -> ServiceResult<Option<PinnedMessage>> {
        require_access(scope, user_id)?;

        let path = scope.pin_path().to_string();
        match self.ctx.store().get(&path).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }
}
