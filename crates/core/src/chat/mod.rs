#![forbid(unsafe_code)]

mod key;
mod message;

pub use key::*;
pub use message::*;
