//! Testing infrastructure for pipetrace integration tests.
//!
//! - `TestWorld`: fluent builder for project trees with pinned mtimes
//! - `assertions`: checks over the JSON emitted by the CLI

pub mod assertions;
pub mod world;

pub use world::{CliResult, TestWorld};
