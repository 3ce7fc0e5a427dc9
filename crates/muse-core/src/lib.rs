//! # muse-core
//!
//! Deterministic building blocks for the muse generation pipeline.
//!
//! This crate holds everything the orchestration layer needs that does NOT
//! touch the network:
//! - Conversation memory: normalizing and bounding message histories
//! - Backend recommendation: ranking generation backends for a prompt
//! - Shared types: messages, roles, backend identifiers
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No I/O**: Nothing here suspends, blocks, or calls a backend
//! 3. **Total**: Normalization and scoring never fail; malformed input is
//!    filtered, not rejected
//!
//! ## Example
//!
//! ```rust,ignore
//! use muse_core::{ConversationContext, recommend};
//!
//! let context = ConversationContext::normalize(&history);
//! let ranking = recommend("You are a pirate, speak like one");
//! println!("try {} first", ranking.scores[0].backend);
//! ```

pub mod backend;
pub mod memory;
pub mod message;
pub mod recommend;

// Re-export main types at crate root
pub use backend::{BackendId, BackendIdError};
pub use memory::{ConversationContext, RawMessage};
pub use message::{Message, Role};
pub use recommend::{recommend, ModelScore, Recommendation};
