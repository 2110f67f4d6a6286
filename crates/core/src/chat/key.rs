#![forbid(unsafe_code)]

use crate::error::CoreError;
use crate::ids::{KEY_SEPARATOR, UserId};

/// Canonical identifier of a two-party conversation.
///
/// Both participants derive the same key independently: the ids are ordered
/// byte-wise and joined with [`KEY_SEPARATOR`], so `key(a, b) == key(b, a)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Validates a key read back from storage.
    pub fn parse(value: &str) -> Result<Self, ConversationKeyError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConversationKeyError::Empty);
        }
        let Some((first, second)) = value.split_once(KEY_SEPARATOR) else {
            return Err(ConversationKeyError::MissingSeparator);
        };
        let first = UserId::try_new(first).map_err(|_| ConversationKeyError::InvalidParticipant)?;
        let second =
            UserId::try_new(second).map_err(|_| ConversationKeyError::InvalidParticipant)?;
        if first == second {
            return Err(ConversationKeyError::SameParticipant);
        }
        if first.as_str() > second.as_str() {
            return Err(ConversationKeyError::NotCanonical);
        }
        Ok(Self(value.to_string()))
    }

    /// True for the degenerate `a_a` key, which no stored chat may use.
    pub fn is_self_conversation(&self) -> bool {
        let (first, second) = self.participants();
        first == second
    }

    pub fn participants(&self) -> (&str, &str) {
        self.0
            .split_once(KEY_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }

    pub fn involves(&self, user: &str) -> bool {
        let (first, second) = self.participants();
        first == user || second == user
    }

    /// The peer of `user` in this conversation, if `user` takes part in it.
    pub fn other_participant(&self, user: &str) -> Option<&str> {
        let (first, second) = self.participants();
        if first == user {
            Some(second)
        } else if second == user {
            Some(first)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationKeyError {
    Empty,
    MissingSeparator,
    InvalidParticipant,
    NotCanonical,
    SameParticipant,
}

impl ConversationKeyError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "conversation key must not be empty",
            Self::MissingSeparator => "conversation key must join two ids with '_'",
            Self::InvalidParticipant => "conversation key contains an invalid participant id",
            Self::NotCanonical => "conversation key participants are not in sorted order",
            Self::SameParticipant => "conversation key must name two different participants",
        }
    }
}

impl From<ConversationKeyError> for CoreError {
    fn from(value: ConversationKeyError) -> Self {
        CoreError::InvalidArgument(value.message())
    }
}

/// Derives the conversation key for two raw participant ids.
///
/// Ids are opaque: they are compared byte-wise exactly as given, so `"alice "`
/// and `"alice"` are different participants. Equal ids produce the degenerate
/// key `a_a`; use [`conversation_key_between`] where a self-conversation must
/// be refused.
pub fn compute_conversation_key(id_a: &str, id_b: &str) -> Result<ConversationKey, CoreError> {
    if id_a.is_empty() || id_b.is_empty() {
        return Err(CoreError::InvalidArgument("participant id must not be empty"));
    }
    if id_a.contains(KEY_SEPARATOR) || id_b.contains(KEY_SEPARATOR) {
        return Err(CoreError::InvalidArgument("participant id must not contain '_'"));
    }
    let (low, high) = if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) };
    Ok(ConversationKey(format!("{low}{KEY_SEPARATOR}{high}")))
}

pub fn conversation_key_between(a: &UserId, b: &UserId) -> Result<ConversationKey, CoreError> {
    if a == b {
        return Err(CoreError::InvalidArgument(
            "cannot open a conversation with yourself",
        ));
    }
    compute_conversation_key(a.as_str(), b.as_str())
}
