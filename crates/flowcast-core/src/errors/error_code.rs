//! FlowcastErrorCode trait for structured error codes at API boundaries.

/// Every error enum implements this to expose a stable code string
/// for callers that serialize errors (dashboards, CLIs, bindings).
pub trait FlowcastErrorCode {
    /// Returns the error code string (e.g., "NODE_NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const NODE_NOT_FOUND: &str = "NODE_NOT_FOUND";
pub const INVALID_DURATION: &str = "INVALID_DURATION";
pub const EMPTY_SAMPLES: &str = "EMPTY_SAMPLES";
