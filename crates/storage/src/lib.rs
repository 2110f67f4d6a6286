#![forbid(unsafe_code)]

mod document;
mod error;
mod path;
mod sqlite;
mod watch;

pub use document::*;
pub use error::StoreError;
pub use path::{CollectionPath, DocPath};
pub use sqlite::SqliteStore;
pub use watch::{ChangeEvent, ChangeKind, Subscription};
