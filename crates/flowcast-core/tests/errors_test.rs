//! Tests for Flowcast error types and their codes.

use flowcast_core::errors::{ConfigError, FlowcastErrorCode, ForecastError, GraphError};

#[test]
fn test_every_error_has_a_code() {
    let graph = GraphError::NodeNotFound { id: 42 };
    assert_eq!(graph.error_code(), "NODE_NOT_FOUND");
    assert_eq!(
        graph.coded_string(),
        "[NODE_NOT_FOUND] Node #42 is not part of the dependency graph"
    );

    let forecast = ForecastError::InvalidDuration { days: 120.0, max: 90.0 };
    assert_eq!(forecast.error_code(), "INVALID_DURATION");
    assert!(forecast.to_string().contains("120"));

    assert_eq!(ForecastError::EmptySamples.error_code(), "EMPTY_SAMPLES");

    let config = ConfigError::ValidationFailed {
        field: "forecast.trials".into(),
        message: "too many".into(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");
    assert!(config.coded_string().starts_with("[CONFIG_ERROR]"));
}
