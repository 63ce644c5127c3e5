//! Message service
//!
//! Send, list, edit and delete chat messages, and track read receipts in direct
//! conversations. Edits and deletes patch or clear the scope's pin pointer in the
//! same transaction as the message write.

use tracing::{info, instrument};
use validator::Validate;

use gamehub_core::entities::{
    ChatMessage, Conversation, ParticipantInfo, PinnedMessage, UserProfile, ANONYMOUS_NAME,
};
use gamehub_core::error::DomainError;
use gamehub_core::traits::RepoResult;
use gamehub_core::value_objects::{ChatScope, ConversationId, DocumentPath};
use gamehub_store::Transaction;

use crate::dto::{EditMessageRequest, SendMessageRequest};

use super::context::{Caller, ServiceContext};
use super::error::ServiceResult;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a message.
    ///
    /// Direct messages start out read by their author and refresh the conversation
    /// summary in the same transaction.
    #[instrument(skip(self, scope, request), fields(scope = %scope, user_id = %caller.user_id))]
    pub async fn send_message(
        &self,
        scope: &ChatScope,
        caller: &Caller,
        request: SendMessageRequest,
    ) -> ServiceResult<ChatMessage> {
        request.validate()?;
        require_access(scope, &caller.user_id)?;
        let text = ChatMessage::normalize_text(&request.text)?;

        let message_id = self.ctx.generate_id();
        let scope_owned = scope.clone();
        let caller_owned = caller.clone();

        let message = self
            .ctx
            .transaction(move |tx| {
                let scope = scope_owned.clone();
                let caller = caller_owned.clone();
                let message_id = message_id.clone();
                let text = text.clone();
                Box::pin(async move {
                    let author_name = caller.display_name(tx).await?;
                    let mut message =
                        ChatMessage::new(message_id, caller.user_id.clone(), author_name, &text)?;

                    if let Some(conversation_id) = scope.conversation_id() {
                        message.mark_read_by(&caller.user_id);
                        touch_conversation(tx, conversation_id, &caller.user_id, &message).await?;
                    }

                    tx.set(&scope.message_path(&message.id).to_string(), &message)?;
                    Ok(message)
                })
            })
            .await?;

        info!(message_id = %message.id, "Message sent");
        Ok(message)
    }

    /// Messages of a scope, oldest first
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn list_messages(
        &self,
        scope: &ChatScope,
        user_id: &str,
    ) -> ServiceResult<Vec<ChatMessage>> {
        require_access(scope, user_id)?;

        let docs = self
            .ctx
            .store()
            .list(&scope.messages_collection())
            .await?;
        let mut messages = docs
            .iter()
            .map(|doc| doc.decode_keyed::<ChatMessage>())
            .collect::<Result<Vec<_>, _>>()?;
        messages.sort_by_key(ChatMessage::sort_key);
        Ok(messages)
    }

    /// Replace a message's text; author only.
    ///
    /// A pinned copy of the message is patched in the same transaction.
    #[instrument(skip(self, scope, request), fields(scope = %scope))]
    pub async fn edit_message(
        &self,
        scope: &ChatScope,
        message_id: &str,
        editor_id: &str,
        request: EditMessageRequest,
    ) -> ServiceResult<ChatMessage> {
        request.validate()?;
        require_access(scope, editor_id)?;
        let text = ChatMessage::normalize_text(&request.text)?;

        let scope_owned = scope.clone();
        let message_id_owned = message_id.to_string();
        let editor = editor_id.to_string();

        let (message, pin_patched) = self
            .ctx
            .transaction(move |tx| {
                let scope = scope_owned.clone();
                let message_id = message_id_owned.clone();
                let editor = editor.clone();
                let text = text.clone();
                Box::pin(async move {
                    let path = scope.message_path(&message_id).to_string();
                    let mut message = load_message(tx, &path, &message_id).await?;
                    if !message.is_author(&editor) {
                        return Err(DomainError::NotMessageAuthor);
                    }

                    message.edit(&text)?;
                    tx.set(&path, &message)?;

                    let pin_path = scope.pin_path().to_string();
                    let mut pin_patched = false;
                    if let Some(mut pin) = tx.get_as::<PinnedMessage>(&pin_path).await? {
                        if pin.points_to(&message_id) {
                            pin.message = message.clone();
                            tx.set(&pin_path, &pin)?;
                            pin_patched = true;
                        }
                    }
                    Ok((message, pin_patched))
                })
            })
            .await?;

        info!(message_id = %message_id, pin_patched, "Message edited");
        Ok(message)
    }

    /// Delete a message; author or admin.
    ///
    /// Clears the pin pointer in the same transaction if it pointed at the message.
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn delete_message(
        &self,
        scope: &ChatScope,
        message_id: &str,
        actor_id: &str,
    ) -> ServiceResult<()> {
        require_access(scope, actor_id)?;

        let scope_owned = scope.clone();
        let message_id_owned = message_id.to_string();
        let actor = actor_id.to_string();

        let pin_cleared = self
            .ctx
            .transaction(move |tx| {
                let scope = scope_owned.clone();
                let message_id = message_id_owned.clone();
                let actor = actor.clone();
                Box::pin(async move {
                    let path = scope.message_path(&message_id).to_string();
                    let message = load_message(tx, &path, &message_id).await?;
                    if !message.is_author(&actor) {
                        let profile_path = DocumentPath::user(&actor).to_string();
                        let is_admin = tx
                            .get_as::<UserProfile>(&profile_path)
                            .await?
                            .is_some_and(|p| p.is_admin());
                        if !is_admin {
                            return Err(DomainError::NotMessageAuthor);
                        }
                    }

                    tx.delete(&path);

                    let pin_path = scope.pin_path().to_string();
                    let pinned = tx
                        .get_as::<PinnedMessage>(&pin_path)
                        .await?
                        .is_some_and(|pin| pin.points_to(&message_id));
                    if pinned {
                        tx.delete(&pin_path);
                    }
                    Ok(pinned)
                })
            })
            .await?;

        info!(message_id = %message_id, actor_id = %actor_id, pin_cleared, "Message deleted");
        Ok(())
    }

    /// Add `user_id` to the read receipts of the given messages.
    ///
    /// All receipts are written in one transaction. Missing ids are skipped and
    /// repeating the call changes nothing. Returns how many messages changed.
    #[instrument(skip(self, conversation_id, message_ids), fields(conversation_id = %conversation_id, count = message_ids.len()))]
    pub async fn mark_messages_read(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[String],
        user_id: &str,
    ) -> ServiceResult<usize> {
        if !conversation_id.includes(user_id) {
            return Err(DomainError::NotParticipant.into());
        }

        let mut ids = message_ids.to_vec();
        ids.sort();
        ids.dedup();

        let scope = ChatScope::Direct(conversation_id.clone());
        let reader = user_id.to_string();

        let updated = self
            .ctx
            .transaction(move |tx| {
                let scope = scope.clone();
                let ids = ids.clone();
                let reader = reader.clone();
                Box::pin(async move {
                    let mut updated = 0;
                    for id in &ids {
                        let path = scope.message_path(id).to_string();
                        let Some(mut message) = tx.get_keyed::<ChatMessage>(&path).await? else {
                            continue;
                        };
                        if message.mark_read_by(&reader) {
                            tx.set(&path, &message)?;
                            updated += 1;
                        }
                    }
                    Ok(updated)
                })
            })
            .await?;

        info!(updated, "Messages marked read");
        Ok(updated)
    }

    /// Mark every message in a conversation that `user_id` did not write and has
    /// not read yet. Returns how many messages changed.
    #[instrument(skip(self, conversation_id), fields(conversation_id = %conversation_id))]
    pub async fn mark_conversation_read(
        &self,
        conversation_id: &ConversationId,
        user_id: &str,
    ) -> ServiceResult<usize> {
        if !conversation_id.includes(user_id) {
            return Err(DomainError::NotParticipant.into());
        }

        let scope = ChatScope::Direct(conversation_id.clone());
        let reader = user_id.to_string();

        let updated = self
            .ctx
            .transaction(move |tx| {
                let scope = scope.clone();
                let reader = reader.clone();
                Box::pin(async move {
                    let mut updated = 0;
                    for doc in tx.list(&scope.messages_collection()).await? {
                        let mut message: ChatMessage = doc.decode_keyed()?;
                        if message.is_author(&reader) {
                            continue;
                        }
                        if message.mark_read_by(&reader) {
                            tx.set(&doc.path, &message)?;
                            updated += 1;
                        }
                    }
                    Ok(updated)
                })
            })
            .await?;

        info!(updated, "Conversation marked read");
        Ok(updated)
    }
}

/// Fail with `NotParticipant` unless `user_id` belongs to `scope`
pub(crate) fn require_access(scope: &ChatScope, user_id: &str) -> Result<(), DomainError> {
    if scope.admits(user_id) {
        Ok(())
    } else {
        Err(DomainError::NotParticipant)
    }
}

/// Read a message that must exist
pub(crate) async fn load_message(
    tx: &mut Transaction<'_>,
    path: &str,
    message_id: &str,
) -> RepoResult<ChatMessage> {
    tx.get_keyed::<ChatMessage>(path)
        .await?
        .ok_or_else(|| DomainError::MessageNotFound(message_id.to_string()))
}

/// Upsert the conversation summary for a new message
async fn touch_conversation(
    tx: &mut Transaction<'_>,
    conversation_id: &ConversationId,
    sender_id: &str,
    message: &ChatMessage,
) -> RepoResult<()> {
    let path = DocumentPath::conversation(conversation_id.as_str()).to_string();
    let mut conversation = tx
        .get_as::<Conversation>(&path)
        .await?
        .unwrap_or_else(|| Conversation::new(conversation_id.clone()));

    let sender = participant_info(tx, sender_id, Some(message.author_name.clone())).await?;
    if let Some(peer_id) = conversation_id.peer_of(sender_id) {
        if !conversation.participants_info.contains_key(peer_id) {
            let peer = participant_info(tx, peer_id, None).await?;
            conversation
                .participants_info
                .insert(peer_id.to_string(), peer);
        }
    }

    conversation.record_message(
        sender_id,
        sender,
        &message.text,
        message.created_at.unwrap_or_else(chrono::Utc::now),
    );
    tx.set(&path, &conversation)
}

async fn participant_info(
    tx: &mut Transaction<'_>,
    user_id: &str,
    name: Option<String>,
) -> RepoResult<ParticipantInfo> {
    let profile = tx
        .get_as::<UserProfile>(&DocumentPath::user(user_id).to_string())
        .await?;
    let photo_url = profile.as_ref().map(|p| p.photo_url.clone()).unwrap_or_default();
    let name = name
        .or_else(|| profile.map(|p| p.name))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
    Ok(ParticipantInfo { name, photo_url })
}
