//! Ports implemented by the infrastructure layer

mod store;

pub use store::{
    decode, encode, Document, DocumentStore, Keyed, Precondition, RepoResult,
    VersionedDocument, WriteBatch, WriteOp,
};
