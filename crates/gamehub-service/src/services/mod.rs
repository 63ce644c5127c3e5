//! Business logic services
//!
//! Services are cheap borrowed views over a [`ServiceContext`]; construct one per call.

pub mod activity;
pub mod context;
pub mod conversation;
pub mod error;
pub mod game;
pub mod message;
pub mod pin;
pub mod reaction;
pub mod review;
pub mod user;

// Re-export all services for convenience
pub use activity::ActivityService;
pub use context::{Caller, ServiceContext, ServiceContextBuilder};
pub use conversation::ConversationService;
pub use error::{ServiceError, ServiceResult};
pub use game::GameService;
pub use message::MessageService;
pub use pin::PinService;
pub use reaction::ReactionService;
pub use review::ReviewService;
pub use user::UserService;
