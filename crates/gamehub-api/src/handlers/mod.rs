//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod chats;
pub mod conversations;
pub mod games;
pub mod health;
pub mod users;
