#![forbid(unsafe_code)]

use crate::error::CoreError;

/// Joins the two participants of a conversation key. User ids may not contain it.
pub const KEY_SEPARATOR: char = '_';

const MAX_USER_ID_LEN: usize = 128;

/// Opaque account identifier handed out by the authentication provider.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, UserIdError> {
        let value = value.into();
        let trimmed = value.trim();
        validate_user_id(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserIdError {
    Empty,
    TooLong,
    ContainsSeparator,
    ContainsControl,
}

impl UserIdError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "user id must not be empty",
            Self::TooLong => "user id is too long",
            Self::ContainsSeparator => "user id must not contain '_'",
            Self::ContainsControl => "user id contains control characters",
        }
    }
}

impl From<UserIdError> for CoreError {
    fn from(value: UserIdError) -> Self {
        CoreError::InvalidArgument(value.message())
    }
}

fn validate_user_id(value: &str) -> Result<(), UserIdError> {
    if value.is_empty() {
        return Err(UserIdError::Empty);
    }
    if value.len() > MAX_USER_ID_LEN {
        return Err(UserIdError::TooLong);
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(UserIdError::ContainsSeparator);
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(UserIdError::ContainsControl);
    }
    Ok(())
}
