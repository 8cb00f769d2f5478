//! Error handling for Flowcast.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod forecast_error;
pub mod graph_error;

pub use config_error::ConfigError;
pub use error_code::FlowcastErrorCode;
pub use forecast_error::ForecastError;
pub use graph_error::GraphError;
