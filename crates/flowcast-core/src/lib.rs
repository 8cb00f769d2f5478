//! Flowcast core: shared types, errors, configuration, tracing, and constants.
//!
//! Everything the analysis engines need that is not itself an algorithm lives
//! here so the engines stay pure functions of their inputs.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
