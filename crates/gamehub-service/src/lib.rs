//! # gamehub-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Every mutation runs as an optimistic transaction over the document store, so
//! derived values (ratings, counters, pin snapshots, read receipts) are written in
//! the same atomic step as the data they derive from.

pub mod dto;
pub mod services;

pub use services::{
    ActivityService, Caller, ConversationService, GameService, MessageService, PinService,
    ReactionService, ReviewService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, UserService,
};
