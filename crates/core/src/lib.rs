#![forbid(unsafe_code)]

pub mod chat;
pub mod eco;
pub mod error;
pub mod ids;
pub mod model;
pub mod ports;

pub use chat::{ConversationKey, compute_conversation_key, conversation_key_between};
pub use eco::{Badge, EcoProgress, derive_badges, log_activity};
pub use error::CoreError;
pub use ids::UserId;
