//! Test fixtures and data generators
//!
//! Provides reusable request bodies for integration tests.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique user id for a test actor
pub fn unique_user(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// Create game request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl CreateGameRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Test Game {suffix}"),
            slug: None,
            description: "A game used by the integration tests".to_string(),
            category: "PC".to_string(),
            tags: vec!["RPG".to_string()],
        }
    }

    pub fn with_tags(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(ToString::to_string).collect(),
            ..Self::unique()
        }
    }
}

/// Submit review request
#[derive(Debug, Serialize)]
pub struct ReviewRequest {
    pub author: String,
    pub rating: u8,
    pub comment: String,
}

impl ReviewRequest {
    pub fn new(rating: u8) -> Self {
        Self {
            author: "Tester".to_string(),
            rating,
            comment: "Solid game, would play again".to_string(),
        }
    }
}

/// Send or edit message request
#[derive(Debug, Serialize)]
pub struct MessageRequest {
    pub text: String,
}

impl MessageRequest {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Pin message request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRequest {
    pub message_id: String,
}

/// Mark read request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub message_ids: Vec<String>,
}
