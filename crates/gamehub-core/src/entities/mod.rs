//! Domain entities - core business objects

mod conversation;
mod game;
mod message;
mod pinned;
mod review;
mod user;

pub use conversation::{Conversation, ParticipantInfo};
pub use game::{Game, GameCategory, Media, NewsUpdate, RatingAggregate};
pub use message::{ChatMessage, ReactionToggle, MAX_MESSAGE_LENGTH};
pub use pinned::PinnedMessage;
pub use review::{Review, MAX_RATING, MIN_RATING};
pub use user::{UserProfile, UserRole, ANONYMOUS_NAME, NO_EMAIL};
