//! Forecasting errors.

use super::error_code::{self, FlowcastErrorCode};

/// Errors raised when constructing forecasting inputs.
///
/// Sparse history is not an error: the sampler falls back to a synthetic
/// distribution and attaches a warning instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Cycle time {days} days is outside the valid range (0, {max})")]
    InvalidDuration { days: f64, max: f64 },

    #[error("Sample set is empty")]
    EmptySamples,
}

impl FlowcastErrorCode for ForecastError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => error_code::INVALID_DURATION,
            Self::EmptySamples => error_code::EMPTY_SAMPLES,
        }
    }
}
