//! Shared test utilities for the GraphQL validation crates.
//!
//! - [`assertions`]: consistent formatting of diagnostics for insta snapshots
//! - [`fixtures`]: schemas and documents reused across crates

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
