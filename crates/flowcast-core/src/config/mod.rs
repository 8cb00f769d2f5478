//! Configuration system for Flowcast.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod flowcast_config;
pub mod forecast_config;
pub mod graph_config;

pub use flowcast_config::{CliOverrides, FlowcastConfig};
pub use forecast_config::ForecastConfig;
pub use graph_config::GraphConfig;
