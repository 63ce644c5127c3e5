//! API Integration Tests
//!
//! Each test spawns the server on an ephemeral port over a fresh in-memory store.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn server_with_admin() -> (TestServer, String) {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = unique_user("admin");
    server.seed_admin(&admin).await.expect("Failed to seed admin");
    (server, admin)
}

async fn create_game(server: &TestServer, admin: &str, request: &CreateGameRequest) -> Value {
    let response = server.post_as("/games", admin, request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn send(server: &TestServer, scope: &str, user: &str, text: &str) -> Value {
    let response = server
        .post_as(
            &format!("/chats/{scope}/messages"),
            user,
            &MessageRequest::new(text),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get_raw("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_missing_identity_header() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/users/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_IDENTITY");
}

#[tokio::test]
async fn test_identity_with_slash_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_as("/users/@me", "a/b").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_IDENTITY");
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_sync_creates_profile() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_user("user");

    let response = server.put_empty_as("/users/@me", &user).await.unwrap();
    let profile: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile["uid"], user.as_str());
    assert_eq!(profile["role"], "user");
    assert_eq!(profile["reviewsCount"], 0);

    let response = server
        .patch_as("/users/@me", &user, &json!({ "favoriteGenre": "RPG" }))
        .await
        .unwrap();
    let profile: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile["favoriteGenre"], "RPG");
}

#[tokio::test]
async fn test_unknown_favorite_genre_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_user("user");
    server.put_empty_as("/users/@me", &user).await.unwrap();

    let response = server
        .patch_as("/users/@me", &user, &json!({ "favoriteGenre": "rpg" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "UNKNOWN_GENRE");
}

// ============================================================================
// Game Tests
// ============================================================================

#[tokio::test]
async fn test_create_game_requires_admin() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_user("user");
    server.put_empty_as("/users/@me", &user).await.unwrap();

    let response = server
        .post_as("/games", &user, &CreateGameRequest::unique())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "MISSING_PERMISSIONS");
}

#[tokio::test]
async fn test_create_and_fetch_game_by_slug() {
    let (server, admin) = server_with_admin().await;
    let request = CreateGameRequest {
        slug: Some(format!("hollow-{}", unique_suffix())),
        ..CreateGameRequest::unique()
    };
    let game = create_game(&server, &admin, &request).await;
    assert_eq!(game["rating"], 0.0);
    assert_eq!(game["reviewsCount"], 0);

    let slug = request.slug.as_deref().unwrap();
    let response = server.get(&format!("/games/slug/{slug}")).await.unwrap();
    let fetched: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched["id"], game["id"]);

    // Second game with the same slug
    let response = server.post_as("/games", &admin, &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "SLUG_TAKEN");
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/games/missing").await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_GAME");
}

// ============================================================================
// Review Tests
// ============================================================================

#[tokio::test]
async fn test_reviews_update_aggregates() {
    let (server, admin) = server_with_admin().await;
    let game = create_game(&server, &admin, &CreateGameRequest::unique()).await;
    let game_id = game["id"].as_str().unwrap();
    let reviewer = unique_user("reviewer");
    server.put_empty_as("/users/@me", &reviewer).await.unwrap();

    for rating in [5, 2] {
        let response = server
            .post_as(
                &format!("/games/{game_id}/reviews"),
                &reviewer,
                &ReviewRequest::new(rating),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.get(&format!("/games/{game_id}")).await.unwrap();
    let game: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(game["reviewsCount"], 2);
    assert_eq!(game["rating"], 3.5);
    assert_eq!(game["reviews"][1]["rating"], 2);

    let response = server.get_as("/users/@me", &reviewer).await.unwrap();
    let profile: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile["reviewsCount"], 2);
}

#[tokio::test]
async fn test_invalid_review_rejected() {
    let (server, admin) = server_with_admin().await;
    let game = create_game(&server, &admin, &CreateGameRequest::unique()).await;
    let game_id = game["id"].as_str().unwrap();

    let response = server
        .post_as(
            &format!("/games/{game_id}/reviews"),
            "reviewer",
            &ReviewRequest::new(6),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let response = server.get(&format!("/games/{game_id}")).await.unwrap();
    let game: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(game["reviewsCount"], 0);
}

#[tokio::test]
async fn test_user_activity_and_genres() {
    let (server, admin) = server_with_admin().await;
    let rpg = create_game(&server, &admin, &CreateGameRequest::with_tags(&["RPG", "Action"])).await;
    let puzzle = create_game(&server, &admin, &CreateGameRequest::with_tags(&["RPG"])).await;
    let reviewer = unique_user("reviewer");

    for game in [&rpg, &puzzle] {
        let game_id = game["id"].as_str().unwrap();
        let response = server
            .post_as(
                &format!("/games/{game_id}/reviews"),
                &reviewer,
                &ReviewRequest::new(4),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server
        .get_as(&format!("/users/{reviewer}/activity"), &reviewer)
        .await
        .unwrap();
    let activity: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(activity["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(activity["reviewedGames"].as_array().unwrap().len(), 2);

    let response = server
        .get_as(&format!("/users/{reviewer}/genres"), &reviewer)
        .await
        .unwrap();
    let genres: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(genres[0], json!({ "genre": "RPG", "games": 2 }));
    assert_eq!(genres[1], json!({ "genre": "Action", "games": 1 }));
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_team_chat_reaction_toggle() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = unique_user("alice");
    let bob = unique_user("bob");
    let message = send(&server, "team", &alice, "hello team").await;
    let message_id = message["id"].as_str().unwrap();
    let path = format!("/chats/team/messages/{message_id}/reactions/fire");

    let response = server.put_empty_as(&path, &bob).await.unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["outcome"], "added");
    assert_eq!(toggled["reactions"]["fire"], json!([bob.as_str()]));

    let response = server.put_empty_as(&path, &bob).await.unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["outcome"], "removed");
    assert!(toggled["reactions"].get("fire").is_none());
}

#[tokio::test]
async fn test_pin_follows_edit() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = unique_user("alice");
    let message = send(&server, "team", &alice, "original text").await;
    let message_id = message["id"].as_str().unwrap().to_string();

    let response = server
        .put_as(
            "/chats/team/pin",
            &alice,
            &PinRequest {
                message_id: message_id.clone(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .patch_as(
            &format!("/chats/team/messages/{message_id}"),
            &alice,
            &MessageRequest::new("edited text"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_as("/chats/team/pin", &alice).await.unwrap();
    let pin: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pin["message"]["text"], "edited text");
    assert_eq!(pin["message"]["isEdited"], true);

    let response = server
        .delete_as(&format!("/chats/team/messages/{message_id}"), &alice)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_as("/chats/team/pin", &alice).await.unwrap();
    let pin: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pin.is_null());
}

#[tokio::test]
async fn test_only_author_edits() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = unique_user("alice");
    let bob = unique_user("bob");
    let message = send(&server, "team", &alice, "mine").await;
    let message_id = message["id"].as_str().unwrap();

    let response = server
        .patch_as(
            &format!("/chats/team/messages/{message_id}"),
            &bob,
            &MessageRequest::new("not yours"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_MESSAGE_AUTHOR");
}

#[tokio::test]
async fn test_direct_messages_and_read_receipts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = unique_user("alice");
    let bob = unique_user("bob");

    let first = send(&server, &bob, &alice, "hi bob").await;
    send(&server, &bob, &alice, "are you there").await;
    assert_eq!(first["readBy"], json!([alice.as_str()]));

    let response = server.get_as(&format!("/chats/{alice}/messages"), &bob).await.unwrap();
    let messages: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(messages.as_array().unwrap().len(), 2);
    assert_eq!(messages[0]["text"], "hi bob");

    let read_path = format!("/chats/{alice}/read");
    let response = server.post_empty_as(&read_path, &bob).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["updated"], 2);

    let response = server.post_empty_as(&read_path, &bob).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["updated"], 0);

    let response = server
        .post_as(
            &read_path,
            &bob,
            &MarkReadRequest {
                message_ids: vec![first["id"].as_str().unwrap().to_string()],
            },
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["updated"], 0);
}

#[tokio::test]
async fn test_conversations_listed_for_participants() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = unique_user("alice");
    let bob = unique_user("bob");
    let carol = unique_user("carol");
    send(&server, &bob, &alice, "ping").await;

    let response = server.get_as("/conversations", &bob).await.unwrap();
    let conversations: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(conversations.as_array().unwrap().len(), 1);
    assert_eq!(conversations[0]["lastMessage"], "ping");

    let response = server.get_as("/conversations", &carol).await.unwrap();
    let conversations: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(conversations.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_team_scope_cannot_mark_read() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.post_empty_as("/chats/team/read", "alice").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
