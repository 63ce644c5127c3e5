//! Reaction service
//!
//! Toggles emoji reactions on chat messages. The whole reaction map is rewritten in
//! a transaction, so concurrent toggles on one message serialize through retries.

use tracing::{info, instrument};

use gamehub_core::error::DomainError;
use gamehub_core::value_objects::ChatScope;

use crate::dto::ReactionToggleResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::message::{load_message, require_access};

/// Longest accepted emoji key, in characters
const MAX_EMOJI_LENGTH: usize = 32;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add `user_id` to the reactors of `emoji`, or remove them if already present.
    ///
    /// An emoji left without reactors disappears from the map. A message deleted
    /// in the meantime is reported as not found and never recreated.
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn toggle_reaction(
        &self,
        scope: &ChatScope,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> ServiceResult<ReactionToggleResponse> {
        let emoji = emoji.trim().to_string();
        if emoji.is_empty() {
            return Err(DomainError::ValidationError("emoji cannot be empty".to_string()).into());
        }
        if emoji.chars().count() > MAX_EMOJI_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_EMOJI_LENGTH,
            }
            .into());
        }
        require_access(scope, user_id)?;

        let scope_owned = scope.clone();
        let message_id_owned = message_id.to_string();
        let reactor = user_id.to_string();

        let response = self
            .ctx
            .transaction(move |tx| {
                let scope = scope_owned.clone();
                let message_id = message_id_owned.clone();
                let reactor = reactor.clone();
                let emoji = emoji.clone();
                Box::pin(async move {
                    let path = scope.message_path(&message_id).to_string();
                    let mut message = load_message(tx, &path, &message_id).await?;
                    let outcome = message.toggle_reaction(&emoji, &reactor);
                    tx.set(&path, &message)?;
                    Ok(ReactionToggleResponse {
                        outcome,
                        reactions: message.reactions,
                    })
                })
            })
            .await?;

        info!(
            message_id = %message_id,
            user_id = %user_id,
            outcome = ?response.outcome,
            "Reaction toggled"
        );
        Ok(response)
    }
}
