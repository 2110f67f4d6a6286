#![forbid(unsafe_code)]

mod badges;
mod ledger;

pub use badges::*;
pub use ledger::*;

#[cfg(test)]
mod tests;
