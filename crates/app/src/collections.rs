#![forbid(unsafe_code)]

//! Collection and field names of the shared document layout.

use eco_storage::{CollectionPath, Document, StoreError};
use serde_json::Value;

pub const USERS: &str = "users";
pub const ECO_TRACKER: &str = "ecoTracker";
pub const ACTIVITIES: &str = "activities";
pub const CHATS: &str = "chats";
pub const MESSAGES: &str = "messages";
pub const SWAP_ITEMS: &str = "swapItems";
pub const EVENTS: &str = "events";
pub const INTERESTED: &str = "interested";

pub fn root(name: &'static str) -> Result<CollectionPath, StoreError> {
    CollectionPath::root(name)
}

pub(crate) fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}
