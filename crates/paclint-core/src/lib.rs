//! paclint-core: shared foundation for the package analyzer.
//!
//! Errors, configuration, events, tracing setup, constants, and the types that
//! every other crate in the workspace passes around (`Finding`, `RuleId`).

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod traits;
pub mod tracing;
pub mod types;
