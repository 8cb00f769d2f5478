//! Flowcast analysis engines.
//!
//! - [`graph`]: dependency graph analysis over cycles, depths, critical path,
//!   bottlenecks, orphaned-blocked items, components and network metrics.
//! - [`forecast`]: cycle-time sampling and Monte Carlo throughput /
//!   completion-date forecasting under a WIP limit.
//! - [`stats`]: percentile, mean, and standard deviation helpers shared by both.
//!
//! Both engines are pure functions of their inputs (plus an injected random
//! source for forecasting) and hold no shared state.

pub mod forecast;
pub mod graph;
pub mod stats;
