//! Shared types.

pub mod collections;
pub mod finding;

pub use finding::{Finding, RuleId};
