//! Response DTOs for API endpoints
//!
//! Entities serialize directly in their persisted camelCase shape; the types here
//! cover operation results that have no entity of their own.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use gamehub_core::entities::ReactionToggle;

// ============================================================================
// Message Responses
// ============================================================================

/// Result of toggling a reaction
#[derive(Debug, Clone, Serialize)]
pub struct ReactionToggleResponse {
    pub outcome: ReactionToggle,
    /// Full reaction map after the toggle
    pub reactions: BTreeMap<String, Vec<String>>,
}

/// Result of a read-receipt update
#[derive(Debug, Clone, Serialize)]
pub struct MarkReadResponse {
    /// Messages whose receipts changed
    pub updated: usize,
}

/// Result of an unpin
#[derive(Debug, Clone, Serialize)]
pub struct UnpinResponse {
    /// `false` when nothing was pinned
    pub removed: bool,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
}

impl ReadinessResponse {
    pub fn ready(store_healthy: bool) -> Self {
        Self {
            status: if store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
