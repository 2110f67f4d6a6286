#![forbid(unsafe_code)]

pub mod chat;
pub mod collections;
pub mod config;
pub mod eco_tracker;
pub mod error;
pub mod events;
pub mod images;
pub mod profile;
pub mod swap;
mod time;
pub mod views;

pub use chat::Chat;
pub use config::AppConfig;
pub use eco_tracker::EcoTracker;
pub use error::AppError;
pub use events::Events;
pub use images::DirImageHost;
pub use profile::Profile;
pub use swap::Swap;
