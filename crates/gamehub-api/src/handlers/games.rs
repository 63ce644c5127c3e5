//! Game handlers
//!
//! Catalog endpoints and review submission.

use axum::{extract::State, Json};
use gamehub_core::entities::{Game, Review};
use gamehub_service::dto::{CreateGameRequest, SubmitReviewRequest, UpdateGameRequest};
use gamehub_service::{GameService, ReviewService};

use crate::extractors::{AuthUser, GameIdPath, PathParams, SlugPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List games
///
/// GET /games
pub async fn list_games(State(state): State<AppState>) -> ApiResult<Json<Vec<Game>>> {
    let service = GameService::new(state.service_context());
    let games = service.list_games().await?;
    Ok(Json(games))
}

/// Create game (admin)
///
/// POST /games
pub async fn create_game(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGameRequest>,
) -> ApiResult<Created<Game>> {
    let service = GameService::new(state.service_context());
    let game = service.create_game(&auth.user_id, request).await?;
    Ok(Created(game))
}

/// Get game by id
///
/// GET /games/{game_id}
pub async fn get_game(
    State(state): State<AppState>,
    PathParams(path): PathParams<GameIdPath>,
) -> ApiResult<Json<Game>> {
    let service = GameService::new(state.service_context());
    let game = service.get_game(&path.game_id).await?;
    Ok(Json(game))
}

/// Get game by slug
///
/// GET /games/slug/{slug}
pub async fn get_game_by_slug(
    State(state): State<AppState>,
    PathParams(path): PathParams<SlugPath>,
) -> ApiResult<Json<Game>> {
    let service = GameService::new(state.service_context());
    let game = service.get_game_by_slug(&path.slug).await?;
    Ok(Json(game))
}

/// Update game (admin)
///
/// PATCH /games/{game_id}
pub async fn update_game(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<GameIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateGameRequest>,
) -> ApiResult<Json<Game>> {
    let service = GameService::new(state.service_context());
    let game = service
        .update_game(&auth.user_id, &path.game_id, request)
        .await?;
    Ok(Json(game))
}

/// Delete game (admin)
///
/// DELETE /games/{game_id}
pub async fn delete_game(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<GameIdPath>,
) -> ApiResult<NoContent> {
    let service = GameService::new(state.service_context());
    service.delete_game(&auth.user_id, &path.game_id).await?;
    Ok(NoContent)
}

/// Submit a review
///
/// POST /games/{game_id}/reviews
pub async fn submit_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<GameIdPath>,
    ValidatedJson(request): ValidatedJson<SubmitReviewRequest>,
) -> ApiResult<Created<Review>> {
    let service = ReviewService::new(state.service_context());
    let review = service
        .submit_review(&path.game_id, &auth.user_id, request)
        .await?;
    Ok(Created(review))
}
