#![forbid(unsafe_code)]

use eco_core::CoreError;
use eco_core::ids::UserIdError;
use eco_storage::StoreError;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Store(StoreError),
    NotSignedIn,
    NotOwner,
    ImageUploadFailed,
    UnknownId(String),
    Config(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "store: {err}"),
            Self::NotSignedIn => write!(f, "no user is signed in"),
            Self::NotOwner => write!(f, "only the uploader can change this item"),
            Self::ImageUploadFailed => write!(f, "image upload failed"),
            Self::UnknownId(id) => write!(f, "unknown id: {id}"),
            Self::Config(message) => write!(f, "config: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<CoreError> for AppError {
    fn from(value: CoreError) -> Self {
        Self::Core(value)
    }
}

impl From<UserIdError> for AppError {
    fn from(value: UserIdError) -> Self {
        Self::Core(value.into())
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
