//! Conversation handlers

use axum::{extract::State, Json};
use gamehub_core::entities::Conversation;
use gamehub_service::ConversationService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Caller's conversations, newest first
///
/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Conversation>>> {
    let service = ConversationService::new(state.service_context());
    let conversations = service.list_conversations(&auth.user_id).await?;
    Ok(Json(conversations))
}
