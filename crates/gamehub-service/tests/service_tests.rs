//! Service behavior against the in-memory store

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;

use gamehub_core::entities::{Game, GameCategory, ReactionToggle};
use gamehub_core::traits::{DocumentStore, WriteBatch};
use gamehub_core::value_objects::{ChatScope, ConversationId, Genre};
use gamehub_core::DomainError;
use gamehub_service::dto::{
    CreateGameRequest, EditMessageRequest, SendMessageRequest, SubmitReviewRequest,
    SyncProfileRequest, UpdateGameRequest, UpdateProfileRequest,
};
use gamehub_service::{
    ActivityService, Caller, ConversationService, GameService, MessageService, PinService,
    ReactionService, ReviewService, ServiceContext, ServiceError, UserService,
};
use gamehub_store::{MemoryDocumentStore, TransactionConfig};

const ADMIN: &str = "admin";

fn context() -> (ServiceContext, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let config = TransactionConfig {
        max_attempts: 200,
        base_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(10),
    };
    (ServiceContext::new(store.clone(), config), store)
}

async fn seed(store: &MemoryDocumentStore, path: &str, data: serde_json::Value) {
    let mut batch = WriteBatch::new();
    batch.set(path, data);
    store.commit(batch).await.unwrap();
}

async fn seed_admin(store: &MemoryDocumentStore) {
    seed(
        store,
        "users/admin",
        json!({ "uid": ADMIN, "name": "Admin", "email": "admin@example.com", "role": "admin", "reviewsCount": 0 }),
    )
    .await;
}

fn game_request(title: &str, tags: &[&str]) -> CreateGameRequest {
    CreateGameRequest {
        title: title.to_string(),
        slug: None,
        description: String::new(),
        category: GameCategory::Pc,
        tags: tags.iter().map(ToString::to_string).collect(),
        developer: None,
        release_date: None,
        image_url: None,
        website_url: None,
        play_store_url: None,
        app_store_url: None,
        media: Vec::new(),
        news: Vec::new(),
    }
}

async fn create_game_result(ctx: &ServiceContext, title: &str) -> Result<Game, ServiceError> {
    GameService::new(ctx)
        .create_game(ADMIN, game_request(title, &[]))
        .await
}

async fn create_game(ctx: &ServiceContext, title: &str, tags: &[&str]) -> String {
    GameService::new(ctx)
        .create_game(ADMIN, game_request(title, tags))
        .await
        .unwrap()
        .id
}

fn review(rating: u8) -> SubmitReviewRequest {
    SubmitReviewRequest {
        author: "Reviewer".to_string(),
        rating,
        comment: "Played it all weekend".to_string(),
    }
}

fn send(text: &str) -> SendMessageRequest {
    SendMessageRequest {
        text: text.to_string(),
    }
}

fn domain(err: &ServiceError) -> &DomainError {
    err.as_domain().expect("expected a domain error")
}

// ============================================================================
// Reviews
// ============================================================================

#[tokio::test]
async fn test_first_review_sets_rating() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    let game_id = create_game(&ctx, "Hollow Knight", &["Action"]).await;

    UserService::new(&ctx)
        .get_or_create_profile(&Caller::new("u1"), SyncProfileRequest::default())
        .await
        .unwrap();
    ReviewService::new(&ctx)
        .submit_review(&game_id, "u1", review(5))
        .await
        .unwrap();

    let game = GameService::new(&ctx).get_game(&game_id).await.unwrap();
    assert!((game.rating - 5.0).abs() < f64::EPSILON);
    assert_eq!(game.reviews_count, 1);
    assert_eq!(game.reviews.len(), 1);
    assert!(game.reviews[0].created_at.is_some());

    let profile = UserService::new(&ctx).get_profile("u1").await.unwrap();
    assert_eq!(profile.reviews_count, 1);
}

#[tokio::test]
async fn test_review_folds_into_existing_mean() {
    let (ctx, store) = context();
    let existing: Vec<_> = (0..3)
        .map(|i| {
            json!({
                "id": format!("r{i}"),
                "author": "Old",
                "authorId": format!("old{i}"),
                "rating": 4,
                "comment": "Solid all around",
            })
        })
        .collect();
    seed(
        &store,
        "games/g1",
        json!({
            "id": "g1", "slug": "g1", "title": "G1", "description": "", "category": "PC",
            "tags": [], "rating": 4.0, "reviewsCount": 3, "reviews": existing,
        }),
    )
    .await;

    ReviewService::new(&ctx)
        .submit_review("g1", "u1", review(2))
        .await
        .unwrap();

    let game = GameService::new(&ctx).get_game("g1").await.unwrap();
    assert!((game.rating - 3.5).abs() < 1e-9);
    assert_eq!(game.reviews_count, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reviews_are_all_counted() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    seed(
        &store,
        "users/fan",
        json!({ "uid": "fan", "name": "Fan", "email": "fan@example.com", "role": "user", "reviewsCount": 0 }),
    )
    .await;
    let game_id = create_game(&ctx, "Celeste", &[]).await;

    let ratings: Vec<u8> = (0..12).map(|i| i % 5 + 1).collect();
    let handles: Vec<_> = ratings
        .iter()
        .map(|&rating| {
            let ctx = ctx.clone();
            let game_id = game_id.clone();
            tokio::spawn(async move {
                ReviewService::new(&ctx)
                    .submit_review(&game_id, "fan", review(rating))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let game = GameService::new(&ctx).get_game(&game_id).await.unwrap();
    let expected = ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64;
    assert_eq!(game.reviews_count as usize, ratings.len());
    assert_eq!(game.reviews.len(), ratings.len());
    assert!((game.rating - expected).abs() < 1e-9);

    let profile = UserService::new(&ctx).get_profile("fan").await.unwrap();
    assert_eq!(profile.reviews_count as usize, ratings.len());
}

#[tokio::test]
async fn test_review_keeps_catalog_fields() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    seed(
        &store,
        "games/g1",
        json!({
            "slug": "g1", "title": "G1", "description": "", "category": "Mobile",
            "websiteUrl": "https://g1.example",
            "playStoreUrl": "https://play.example/g1",
            "media": [{ "type": "youtube", "videoId": "abc123" }],
            "news": [{ "id": "n1", "title": "Launch", "date": "2024-01-01", "content": "Out now" }],
            "featuredRank": 3,
        }),
    )
    .await;

    ReviewService::new(&ctx)
        .submit_review("g1", "u1", review(4))
        .await
        .unwrap();
    let update = UpdateGameRequest {
        title: Some("G1 Deluxe".to_string()),
        ..UpdateGameRequest::default()
    };
    GameService::new(&ctx)
        .update_game(ADMIN, "g1", update)
        .await
        .unwrap();

    let stored = store.get("games/g1").await.unwrap().unwrap().data;
    assert_eq!(stored["id"], "g1");
    assert_eq!(stored["title"], "G1 Deluxe");
    assert_eq!(stored["websiteUrl"], "https://g1.example");
    assert_eq!(stored["playStoreUrl"], "https://play.example/g1");
    assert_eq!(stored["media"][0]["videoId"], "abc123");
    assert_eq!(stored["news"][0]["id"], "n1");
    assert_eq!(stored["featuredRank"], 3);
    assert_eq!(stored["reviewsCount"], 1);

    let game = GameService::new(&ctx).get_game("g1").await.unwrap();
    assert_eq!(game.id, "g1");
    assert_eq!(game.website_url.as_deref(), Some("https://g1.example"));
}

#[tokio::test]
async fn test_review_validation_precedes_store() {
    let (ctx, _store) = context();

    let err = ReviewService::new(&ctx)
        .submit_review("missing", "u1", review(6))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = ReviewService::new(&ctx)
        .submit_review("missing", "u1", review(3))
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::GameNotFound(_)));
}

#[tokio::test]
async fn test_reconcile_review_count() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    let game_id = create_game(&ctx, "Hades", &[]).await;
    ReviewService::new(&ctx)
        .submit_review(&game_id, "u1", review(4))
        .await
        .unwrap();
    // Profile created after the review, so its counter missed it.
    seed(&store, "users/u1", json!({ "uid": "u1", "name": "Ann", "reviewsCount": 7 })).await;

    let users = UserService::new(&ctx);
    assert!(users.reconcile_review_count("u1", "u1").await.is_err());

    let profile = users.reconcile_review_count(ADMIN, "u1").await.unwrap();
    assert_eq!(profile.reviews_count, 1);
}

// ============================================================================
// Games
// ============================================================================

#[tokio::test]
async fn test_game_slug_lifecycle() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    let games = GameService::new(&ctx);

    let request = CreateGameRequest {
        title: "Stardew Valley".to_string(),
        slug: None,
        description: "Farming".to_string(),
        category: GameCategory::Pc,
        tags: vec!["Simulation".to_string()],
        developer: None,
        release_date: None,
        image_url: None,
        website_url: None,
        play_store_url: None,
        app_store_url: None,
        media: Vec::new(),
        news: Vec::new(),
    };

    let err = games.create_game("u1", request.clone()).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let game = games.create_game(ADMIN, request.clone()).await.unwrap();
    assert_eq!(game.slug, "stardew-valley");
    assert_eq!(game.reviews_count, 0);

    let err = games.create_game(ADMIN, request).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::SlugTaken(_)));

    let update = UpdateGameRequest {
        slug: Some("stardew".to_string()),
        ..UpdateGameRequest::default()
    };
    games.update_game(ADMIN, &game.id, update).await.unwrap();
    assert_eq!(games.get_game_by_slug("stardew").await.unwrap().id, game.id);
    assert!(games.get_game_by_slug("stardew-valley").await.is_err());

    games.delete_game(ADMIN, &game.id).await.unwrap();
    assert!(games.get_game(&game.id).await.is_err());
    assert!(store.get("game-slugs/stardew").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unindexed_game_keeps_its_slug() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    seed(
        &store,
        "games/legacy",
        json!({ "id": "legacy", "slug": "celeste", "title": "Celeste", "description": "", "category": "PC" }),
    )
    .await;
    let games = GameService::new(&ctx);

    let err = create_game_result(&ctx, "Celeste").await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::SlugTaken(_)));

    let other = create_game(&ctx, "Celeste Farewell", &[]).await;
    let update = UpdateGameRequest {
        slug: Some("celeste".to_string()),
        ..UpdateGameRequest::default()
    };
    let err = games.update_game(ADMIN, &other, update).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::SlugTaken(_)));

    let holders: Vec<_> = games
        .list_games()
        .await
        .unwrap()
        .into_iter()
        .filter(|g| g.slug == "celeste")
        .map(|g| g.id)
        .collect();
    assert_eq!(holders, vec!["legacy".to_string()]);
    assert_eq!(games.get_game_by_slug("celeste").await.unwrap().id, "legacy");
}

#[tokio::test]
async fn test_invalid_slug_rejected() {
    let (ctx, store) = context();
    seed_admin(&store).await;

    let request = CreateGameRequest {
        title: "Bad".to_string(),
        slug: Some("Not A Slug".to_string()),
        description: String::new(),
        category: GameCategory::Mobile,
        tags: vec![],
        developer: None,
        release_date: None,
        image_url: None,
        website_url: None,
        play_store_url: None,
        app_store_url: None,
        media: Vec::new(),
        news: Vec::new(),
    };
    let err = GameService::new(&ctx)
        .create_game(ADMIN, request)
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::InvalidSlug(_)));
}

// ============================================================================
// Activity
// ============================================================================

#[tokio::test]
async fn test_activity_orders_games_by_newest_review() {
    let (ctx, store) = context();
    let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
    for (id, secs, tags) in [("g1", 1, vec!["RPG"]), ("g2", 2, vec!["RPG", "Action"])] {
        seed(
            &store,
            &format!("games/{id}"),
            json!({
                "id": id, "slug": id, "title": id, "description": "", "category": "PC",
                "tags": tags, "rating": 5.0, "reviewsCount": 1,
                "reviews": [{
                    "id": format!("r-{id}"), "author": "Ann", "authorId": "u1", "rating": 5,
                    "comment": "Loved every minute", "createdAt": at(secs),
                }],
            }),
        )
        .await;
    }

    let activity = ActivityService::new(&ctx);
    let feed = activity.get_user_activity("u1").await.unwrap();
    let order: Vec<_> = feed.reviewed_games.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(order, vec!["g2", "g1"]);

    let histogram = activity.genre_histogram("u1").await.unwrap();
    assert_eq!(histogram[0].genre, Genre::Rpg);
    assert_eq!(histogram[0].games, 2);
    assert_eq!(histogram[1].genre, Genre::Action);

    assert!(activity.get_user_activity("").await.unwrap().reviews.is_empty());
}

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn test_profile_created_with_placeholders_and_upgraded() {
    let (ctx, _store) = context();
    let users = UserService::new(&ctx);

    let profile = users
        .get_or_create_profile(&Caller::new("u1"), SyncProfileRequest::default())
        .await
        .unwrap();
    assert_eq!(profile.name, "Anonymous User");
    assert_eq!(profile.email, "No email provided");

    let profile = users
        .get_or_create_profile(
            &Caller::new("u1").with_name("Ann"),
            SyncProfileRequest {
                email: Some("ann@example.com".to_string()),
                ..SyncProfileRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.email, "ann@example.com");
}

#[tokio::test]
async fn test_legacy_profile_gets_counter() {
    let (ctx, store) = context();
    seed(&store, "users/u1", json!({ "name": "Legacy", "email": "l@example.com" })).await;

    UserService::new(&ctx)
        .get_or_create_profile(&Caller::new("u1"), SyncProfileRequest::default())
        .await
        .unwrap();

    let doc = store.get("users/u1").await.unwrap().unwrap();
    assert_eq!(doc.data["reviewsCount"], 0);
    assert_eq!(doc.data["uid"], "u1");
}

#[tokio::test]
async fn test_favorite_genre_must_be_known() {
    let (ctx, _store) = context();
    let users = UserService::new(&ctx);
    users
        .get_or_create_profile(&Caller::new("u1"), SyncProfileRequest::default())
        .await
        .unwrap();

    let err = users
        .update_profile(
            "u1",
            UpdateProfileRequest {
                favorite_genre: Some("rpg".to_string()),
                ..UpdateProfileRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::UnknownGenre(_)));

    let profile = users
        .update_profile(
            "u1",
            UpdateProfileRequest {
                favorite_genre: Some("RPG".to_string()),
                ..UpdateProfileRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.favorite_genre.as_deref(), Some("RPG"));
}

// ============================================================================
// Reactions and pins
// ============================================================================

#[tokio::test]
async fn test_toggle_twice_restores_reactions() {
    let (ctx, _store) = context();
    let message = MessageService::new(&ctx)
        .send_message(&ChatScope::Team, &Caller::new("u1"), send("hello"))
        .await
        .unwrap();
    let reactions = ReactionService::new(&ctx);

    reactions
        .toggle_reaction(&ChatScope::Team, &message.id, "👍", "u2")
        .await
        .unwrap();
    let first = reactions
        .toggle_reaction(&ChatScope::Team, &message.id, "🔥", "u3")
        .await
        .unwrap();
    assert_eq!(first.outcome, ReactionToggle::Added);

    let second = reactions
        .toggle_reaction(&ChatScope::Team, &message.id, "🔥", "u3")
        .await
        .unwrap();
    assert_eq!(second.outcome, ReactionToggle::Removed);
    assert!(!second.reactions.contains_key("🔥"));
    assert_eq!(second.reactions["👍"], vec!["u2".to_string()]);

    let last = reactions
        .toggle_reaction(&ChatScope::Team, &message.id, "👍", "u2")
        .await
        .unwrap();
    assert!(last.reactions.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reactions_record_each_user_once() {
    let (ctx, _store) = context();
    let message = MessageService::new(&ctx)
        .send_message(&ChatScope::Team, &Caller::new("u1"), send("launch day"))
        .await
        .unwrap();

    // Eight users react once; "flip" toggles four times and ends with no reaction.
    let reactors: Vec<String> = (0..8)
        .map(|i| format!("fan{i}"))
        .chain(std::iter::repeat("flip".to_string()).take(4))
        .collect();
    let handles: Vec<_> = reactors
        .into_iter()
        .map(|user| {
            let ctx = ctx.clone();
            let message_id = message.id.clone();
            tokio::spawn(async move {
                ReactionService::new(&ctx)
                    .toggle_reaction(&ChatScope::Team, &message_id, "🎉", &user)
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let messages = MessageService::new(&ctx)
        .list_messages(&ChatScope::Team, "u1")
        .await
        .unwrap();
    let mut users = messages[0].reactions["🎉"].clone();
    assert_eq!(users.len(), 8);
    users.sort();
    users.dedup();
    assert_eq!(users.len(), 8);
    assert!(!users.contains(&"flip".to_string()));
}

#[tokio::test]
async fn test_team_chat_documents_without_id() {
    let (ctx, store) = context();
    seed(
        &store,
        "team-chat/m1",
        json!({
            "text": "first!",
            "author": "Ann",
            "authorId": "u1",
            "photoURL": "https://img.example/ann.png",
            "createdAt": "2024-05-01T10:00:00Z",
        }),
    )
    .await;

    let messages = MessageService::new(&ctx)
        .list_messages(&ChatScope::Team, "u2")
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, "m1");
    assert_eq!(messages[0].author_name, "Ann");

    let reacted = ReactionService::new(&ctx)
        .toggle_reaction(&ChatScope::Team, "m1", "👍", "u2")
        .await
        .unwrap();
    assert_eq!(reacted.outcome, ReactionToggle::Added);

    let pin = PinService::new(&ctx)
        .pin_message(&ChatScope::Team, "m1", &Caller::new("u2"))
        .await
        .unwrap();
    assert_eq!(pin.message.id, "m1");

    let stored = store.get("team-chat/m1").await.unwrap().unwrap().data;
    assert_eq!(stored["photoURL"], "https://img.example/ann.png");
    assert_eq!(stored["reactions"]["👍"], json!(["u2"]));
}

#[tokio::test]
async fn test_reaction_on_deleted_message_is_not_found() {
    let (ctx, store) = context();
    let err = ReactionService::new(&ctx)
        .toggle_reaction(&ChatScope::Team, "gone", "👍", "u1")
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::MessageNotFound(_)));
    assert!(store.get("team-chat/gone").await.unwrap().is_none());
}

#[tokio::test]
async fn test_pin_follows_edit_and_delete() {
    let (ctx, store) = context();
    let author = Caller::new("u1").with_name("Ann");
    let messages = MessageService::new(&ctx);
    let pins = PinService::new(&ctx);

    let message = messages
        .send_message(&ChatScope::Team, &author, send("raid at 8"))
        .await
        .unwrap();
    let pin = pins
        .pin_message(&ChatScope::Team, &message.id, &Caller::new("u2"))
        .await
        .unwrap();
    assert_eq!(pin.message.text, "raid at 8");

    messages
        .edit_message(
            &ChatScope::Team,
            &message.id,
            "u1",
            EditMessageRequest {
                text: "raid at 9".to_string(),
            },
        )
        .await
        .unwrap();
    let pinned = pins.get_pinned(&ChatScope::Team, "u1").await.unwrap().unwrap();
    assert_eq!(pinned.message.text, "raid at 9");
    assert!(pinned.message.is_edited);

    messages
        .delete_message(&ChatScope::Team, &message.id, "u1")
        .await
        .unwrap();
    assert!(pins.get_pinned(&ChatScope::Team, "u1").await.unwrap().is_none());
    assert!(store.get("team-chat-meta/pinned-message").await.unwrap().is_none());
}

#[tokio::test]
async fn test_pin_missing_message_and_idempotent_unpin() {
    let (ctx, _store) = context();
    let pins = PinService::new(&ctx);

    let err = pins
        .pin_message(&ChatScope::Team, "nope", &Caller::new("u1"))
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::MessageNotFound(_)));

    assert!(!pins.unpin_message(&ChatScope::Team, "u1").await.unwrap());
    assert!(!pins.unpin_message(&ChatScope::Team, "u1").await.unwrap());
}

#[tokio::test]
async fn test_edit_and_delete_permissions() {
    let (ctx, store) = context();
    seed_admin(&store).await;
    let messages = MessageService::new(&ctx);
    let message = messages
        .send_message(&ChatScope::Team, &Caller::new("u1"), send("mine"))
        .await
        .unwrap();

    let err = messages
        .edit_message(
            &ChatScope::Team,
            &message.id,
            "u2",
            EditMessageRequest {
                text: "not yours".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::NotMessageAuthor));

    let err = messages
        .delete_message(&ChatScope::Team, &message.id, "u2")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    messages
        .delete_message(&ChatScope::Team, &message.id, ADMIN)
        .await
        .unwrap();
    assert!(messages
        .list_messages(&ChatScope::Team, "u1")
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Direct messages and read receipts
// ============================================================================

#[tokio::test]
async fn test_direct_message_updates_conversation() {
    let (ctx, _store) = context();
    let scope = ChatScope::resolve("u2", "u1").unwrap();
    let message = MessageService::new(&ctx)
        .send_message(&scope, &Caller::new("u1").with_name("Ann"), send("hey"))
        .await
        .unwrap();
    assert_eq!(message.read_by, vec!["u1".to_string()]);

    let conversations = ConversationService::new(&ctx)
        .list_conversations("u2")
        .await
        .unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id.as_str(), "u1_u2");
    assert_eq!(conversations[0].last_message, "hey");
    assert_eq!(conversations[0].participants_info["u1"].name, "Ann");

    assert!(ConversationService::new(&ctx)
        .list_conversations("u3")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_foreign_conversations_are_not_decoded() {
    let (ctx, store) = context();
    let scope = ChatScope::resolve("u1", "u2").unwrap();
    MessageService::new(&ctx)
        .send_message(&scope, &Caller::new("u1"), send("hi"))
        .await
        .unwrap();
    seed(&store, "conversations/u3_u4", json!({ "participants": 7 })).await;
    seed(&store, "conversations/not-a-pair", json!({})).await;

    let conversations = ConversationService::new(&ctx)
        .list_conversations("u1")
        .await
        .unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id.as_str(), "u1_u2");

    let err = ConversationService::new(&ctx)
        .list_conversations("u3")
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::CorruptDocument { .. }));
}

#[tokio::test]
async fn test_mark_read_twice_equals_once() {
    let (ctx, _store) = context();
    let conversation = ConversationId::between("u1", "u2").unwrap();
    let scope = ChatScope::Direct(conversation.clone());
    let messages = MessageService::new(&ctx);

    let mut ids = Vec::new();
    for text in ["one", "two"] {
        let message = messages
            .send_message(&scope, &Caller::new("u1"), send(text))
            .await
            .unwrap();
        ids.push(message.id);
    }
    ids.push("missing".to_string());

    let first = messages
        .mark_messages_read(&conversation, &ids, "u2")
        .await
        .unwrap();
    let after_first = messages.list_messages(&scope, "u2").await.unwrap();

    let second = messages
        .mark_messages_read(&conversation, &ids, "u2")
        .await
        .unwrap();
    let after_second = messages.list_messages(&scope, "u2").await.unwrap();

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert_eq!(after_first, after_second);
    assert!(after_second.iter().all(|m| m.is_read_by("u2")));

    let err = messages
        .mark_messages_read(&conversation, &ids, "u3")
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::NotParticipant));
}

#[tokio::test]
async fn test_mark_conversation_read_skips_own_messages() {
    let (ctx, _store) = context();
    let conversation = ConversationId::between("u1", "u2").unwrap();
    let scope = ChatScope::Direct(conversation.clone());
    let messages = MessageService::new(&ctx);

    messages
        .send_message(&scope, &Caller::new("u1"), send("from u1"))
        .await
        .unwrap();
    messages
        .send_message(&scope, &Caller::new("u2"), send("from u2"))
        .await
        .unwrap();

    let updated = messages
        .mark_conversation_read(&conversation, "u2")
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert_eq!(
        messages
            .mark_conversation_read(&conversation, "u2")
            .await
            .unwrap(),
        0
    );
}
