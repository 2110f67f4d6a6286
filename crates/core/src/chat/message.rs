#![forbid(unsafe_code)]

use crate::error::CoreError;

/// Shown as the sender name when the sender has no profile name yet.
pub const DEFAULT_SENDER_NAME: &str = "You";
/// Shown for a peer whose profile cannot be read.
pub const DEFAULT_PEER_NAME: &str = "User";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub profile_name: String,
    pub text: String,
    pub timestamp_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatPreview {
    pub chat_id: String,
    pub name: String,
    pub last_message: String,
    pub timestamp_ms: i64,
    pub unread_count: u32,
    pub profile_pic_url: String,
}

pub fn validate_message_text(text: &str) -> Result<&str, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidArgument("message text must not be empty"));
    }
    Ok(trimmed)
}

/// Orders previews newest first; ties keep a stable order by chat id.
pub fn sort_previews(previews: &mut [ChatPreview]) {
    previews.sort_by(|a, b| {
        b.timestamp_ms
            .cmp(&a.timestamp_ms)
            .then_with(|| a.chat_id.cmp(&b.chat_id))
    });
}
