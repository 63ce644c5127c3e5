//! Chat handlers
//!
//! Messages, reactions, pins and read receipts for the team chat and direct
//! conversations. The `scope` segment is `team` or the peer's user id.

use axum::{extract::State, Json};
use gamehub_core::entities::{ChatMessage, PinnedMessage};
use gamehub_core::DomainError;
use gamehub_service::dto::{
    EditMessageRequest, MarkReadRequest, MarkReadResponse, PinMessageRequest,
    ReactionToggleResponse, SendMessageRequest, UnpinResponse,
};
use gamehub_service::{MessageService, PinService, ReactionService};

use crate::extractors::{
    AuthUser, MessagePath, OptionalValidatedJson, PathParams, ReactionPath, ScopePath,
    ValidatedJson,
};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// List messages, oldest first
///
/// GET /chats/{scope}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ScopePath>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = MessageService::new(state.service_context());
    let messages = service.list_messages(&scope, &auth.user_id).await?;
    Ok(Json(messages))
}

/// Send a message
///
/// POST /chats/{scope}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ScopePath>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<ChatMessage>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = MessageService::new(state.service_context());
    let message = service
        .send_message(&scope, &auth.caller(), request)
        .await?;
    Ok(Created(message))
}

/// Edit own message
///
/// PATCH /chats/{scope}/messages/{message_id}
pub async fn edit_message(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<MessagePath>,
    ValidatedJson(request): ValidatedJson<EditMessageRequest>,
) -> ApiResult<Json<ChatMessage>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = MessageService::new(state.service_context());
    let message = service
        .edit_message(&scope, &path.message_id, &auth.user_id, request)
        .await?;
    Ok(Json(message))
}

/// Delete a message (author or admin)
///
/// DELETE /chats/{scope}/messages/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<MessagePath>,
) -> ApiResult<NoContent> {
    let scope = path.resolve(&auth.user_id)?;
    let service = MessageService::new(state.service_context());
    service
        .delete_message(&scope, &path.message_id, &auth.user_id)
        .await?;
    Ok(NoContent)
}

/// Toggle the caller's reaction
///
/// PUT /chats/{scope}/messages/{message_id}/reactions/{emoji}
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ReactionPath>,
) -> ApiResult<Json<ReactionToggleResponse>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = ReactionService::new(state.service_context());
    let response = service
        .toggle_reaction(&scope, &path.message_id, &path.emoji, &auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Current pin of a scope, `null` when none
///
/// GET /chats/{scope}/pin
pub async fn get_pinned(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ScopePath>,
) -> ApiResult<Json<Option<PinnedMessage>>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = PinService::new(state.service_context());
    let pinned = service.get_pinned(&scope, &auth.user_id).await?;
    Ok(Json(pinned))
}

/// Pin a message, replacing any earlier pin
///
/// PUT /chats/{scope}/pin
pub async fn pin_message(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ScopePath>,
    ValidatedJson(request): ValidatedJson<PinMessageRequest>,
) -> ApiResult<Json<PinnedMessage>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = PinService::new(state.service_context());
    let pinned = service
        .pin_message(&scope, &request.message_id, &auth.caller())
        .await?;
    Ok(Json(pinned))
}

/// Remove the pin
///
/// DELETE /chats/{scope}/pin
pub async fn unpin_message(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ScopePath>,
) -> ApiResult<Json<UnpinResponse>> {
    let scope = path.resolve(&auth.user_id)?;
    let service = PinService::new(state.service_context());
    let removed = service.unpin_message(&scope, &auth.user_id).await?;
    Ok(Json(UnpinResponse { removed }))
}

/// Mark messages read; every unread message when no ids are given
///
/// POST /chats/{scope}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<ScopePath>,
    OptionalValidatedJson(request): OptionalValidatedJson<MarkReadRequest>,
) -> ApiResult<Json<MarkReadResponse>> {
    let scope = path.resolve(&auth.user_id)?;
    let conversation_id = scope.conversation_id().ok_or_else(|| {
        ApiError::from(DomainError::ValidationError(
            "read receipts are only tracked in direct conversations".to_string(),
        ))
    })?;

    let service = MessageService::new(state.service_context());
    let updated = match request.and_then(|r| r.message_ids) {
        Some(ids) => {
            service
                .mark_messages_read(conversation_id, &ids, &auth.user_id)
                .await?
        }
        None => {
            service
                .mark_conversation_read(conversation_id, &auth.user_id)
                .await?
        }
    };
    Ok(Json(MarkReadResponse { updated }))
}
