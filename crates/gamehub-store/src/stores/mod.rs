//! DocumentStore implementations

mod error;
mod memory;
mod postgres;

pub use memory::{ChangeKind, DocumentChange, MemoryDocumentStore};
pub use postgres::PgDocumentStore;

/// Whether `path` is a direct child of `collection`
pub(crate) fn is_child_of(path: &str, collection: &str) -> bool {
    path.strip_prefix(collection)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|id| !id.is_empty() && !id.contains('/'))
}
