//! Conversation service

use tracing::instrument;

use gamehub_core::entities::Conversation;
use gamehub_core::value_objects::{collections, ConversationId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Conversations `user_id` takes part in, most recently active first
    #[instrument(skip(self))]
    pub async fn list_conversations(&self, user_id: &str) -> ServiceResult<Vec<Conversation>> {
        let docs = self.ctx.store().list(collections::CONVERSATIONS).await?;
        let mut conversations = Vec::new();
        for doc in &docs {
            let member = ConversationId::parse(doc.id()).is_ok_and(|id| id.includes(user_id));
            if member {
                conversations.push(doc.decode::<Conversation>()?);
            }
        }
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }
}
