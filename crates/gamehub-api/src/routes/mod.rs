//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::handlers::{chats, conversations, games, health, users};
use crate::state::AppState;

/// Create the main API router (health routes are added separately so they bypass
/// rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes, served at the root and under /api/v1
pub fn health_routes() -> Router<AppState> {
    let probes = || {
        Router::new()
            .route("/health", get(health::health_check))
            .route("/health/ready", get(health::readiness_check))
    };
    probes().nest("/api/v1", probes())
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(game_routes())
        .merge(user_routes())
        .merge(chat_routes())
        .merge(conversation_routes())
}

/// Game catalog and review routes
fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/slug/:slug", get(games::get_game_by_slug))
        .route(
            "/games/:game_id",
            get(games::get_game)
                .patch(games::update_game)
                .delete(games::delete_game),
        )
        .route("/games/:game_id/reviews", post(games::submit_review))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/@me",
            put(users::sync_current_user)
                .get(users::get_current_user)
                .patch(users::update_current_user),
        )
        .route("/users/:user_id/role", patch(users::update_role))
        .route("/users/:user_id/reconcile", post(users::reconcile_review_count))
        .route("/users/:user_id/activity", get(users::get_activity))
        .route("/users/:user_id/genres", get(users::get_genres))
}

/// Team chat and direct message routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chats/:scope/messages",
            get(chats::list_messages).post(chats::send_message),
        )
        .route(
            "/chats/:scope/messages/:message_id",
            patch(chats::edit_message).delete(chats::delete_message),
        )
        .route(
            "/chats/:scope/messages/:message_id/reactions/:emoji",
            put(chats::toggle_reaction),
        )
        .route(
            "/chats/:scope/pin",
            get(chats::get_pinned)
                .put(chats::pin_message)
                .delete(chats::unpin_message),
        )
        .route("/chats/:scope/read", post(chats::mark_read))
}

/// Conversation routes
fn conversation_routes() -> Router<AppState> {
    Router::new().route("/conversations", get(conversations::list_conversations))
}
