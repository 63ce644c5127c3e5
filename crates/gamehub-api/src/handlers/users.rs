//! User handlers
//!
//! Profiles, roles, and per-user activity.

use axum::{extract::State, Json};
use gamehub_core::entities::UserProfile;
use gamehub_core::projections::{GenreCount, UserActivity};
use gamehub_service::dto::{UpdateProfileRequest, UpdateRoleRequest, SyncProfileRequest};
use gamehub_service::{ActivityService, UserService};

use crate::extractors::{AuthUser, OptionalValidatedJson, PathParams, UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// List profiles
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let service = UserService::new(state.service_context());
    let profiles = service.list_profiles().await?;
    Ok(Json(profiles))
}

/// Get or create the caller's profile
///
/// PUT /users/@me
pub async fn sync_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<SyncProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let service = UserService::new(state.service_context());
    let profile = service
        .get_or_create_profile(&auth.caller(), request.unwrap_or_default())
        .await?;
    Ok(Json(profile))
}

/// Get the caller's profile
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let service = UserService::new(state.service_context());
    let profile = service.get_profile(&auth.user_id).await?;
    Ok(Json(profile))
}

/// Update the caller's profile
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let service = UserService::new(state.service_context());
    let profile = service.update_profile(&auth.user_id, request).await?;
    Ok(Json(profile))
}

/// Change a user's role (admin)
///
/// PATCH /users/{user_id}/role
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<UserIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<Json<UserProfile>> {
    let service = UserService::new(state.service_context());
    let profile = service
        .update_role(&auth.user_id, &path.user_id, request)
        .await?;
    Ok(Json(profile))
}

/// Recompute a user's review counter (admin)
///
/// POST /users/{user_id}/reconcile
pub async fn reconcile_review_count(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParams(path): PathParams<UserIdPath>,
) -> ApiResult<Json<UserProfile>> {
    let service = UserService::new(state.service_context());
    let profile = service
        .reconcile_review_count(&auth.user_id, &path.user_id)
        .await?;
    Ok(Json(profile))
}

/// Reviews and reviewed games of a user
///
/// GET /users/{user_id}/activity
pub async fn get_activity(
    State(state): State<AppState>,
    PathParams(path): PathParams<UserIdPath>,
) -> ApiResult<Json<UserActivity>> {
    let service = ActivityService::new(state.service_context());
    let activity = service.get_user_activity(&path.user_id).await?;
    Ok(Json(activity))
}

/// Genre histogram of a user's reviewed games
///
/// GET /users/{user_id}/genres
pub async fn get_genres(
    State(state): State<AppState>,
    PathParams(path): PathParams<UserIdPath>,
) -> ApiResult<Json<Vec<GenreCount>>> {
    let service = ActivityService::new(state.service_context());
    let histogram = service.genre_histogram(&path.user_id).await?;
    Ok(Json(histogram))
}
