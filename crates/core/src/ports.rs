#![forbid(unsafe_code)]

use crate::ids::UserId;

/// Yields the signed-in account, if any.
pub trait CurrentUserProvider {
    fn current_user(&self) -> Option<UserId>;
}

/// A provider pinned to one account (or to nobody).
#[derive(Clone, Debug, Default)]
pub struct FixedUser(Option<UserId>);

impl FixedUser {
    pub fn signed_in(user: UserId) -> Self {
        Self(Some(user))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl CurrentUserProvider for FixedUser {
    fn current_user(&self) -> Option<UserId> {
        self.0.clone()
    }
}

/// Stores an image blob somewhere reachable and returns its URL.
pub trait ImageHost {
    fn upload(&self, blob: &[u8]) -> Result<String, ImageHostError>;
}

#[derive(Debug)]
pub enum ImageHostError {
    Rejected(&'static str),
    Io(std::io::Error),
}

impl std::fmt::Display for ImageHostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(message) => write!(f, "image rejected: {message}"),
            Self::Io(err) => write!(f, "io: {err}"),
        }
    }
}

impl std::error::Error for ImageHostError {}

impl From<std::io::Error> for ImageHostError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
