//! Error handling utilities for the PostgreSQL store

use gamehub_core::DomainError;
use sqlx::Error as SqlxError;

/// Postgres `serialization_failure`
const SERIALIZATION_FAILURE: &str = "40001";
/// Postgres `deadlock_detected`
const DEADLOCK_DETECTED: &str = "40P01";

/// Convert SQLx error to DomainError
///
/// Lost races between transactions become version conflicts so the caller re-runs
/// its transaction; connection-level failures become transport errors.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if matches!(
            db_err.code().as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        ) {
            return DomainError::VersionConflict {
                path: String::new(),
            };
        }
    }
    match e {
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => DomainError::TransportError(e.to_string()),
        _ => DomainError::InternalError(e.to_string()),
    }
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}
