//! Error types for grant valuation

use thiserror::Error;

/// Result alias used throughout the crate
pub type ValuationResult<T> = Result<T, ValuationError>;

/// Errors raised while building parameters, projecting, or exporting
#[derive(Error, Debug)]
pub enum ValuationError {
    /// A scalar or schedule input is out of range or missing.
    /// Raised before any period is computed.
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: String,
    },

    /// Two series with different period counts were combined
    #[error("Mismatched horizon: {left} periods vs {right} periods")]
    MismatchedHorizon { left: usize, right: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValuationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValuationError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}
