//! Error types shared by the simulation core.

use thiserror::Error;

/// Errors surfaced by the HVAC, building and weather models.
///
/// None of these are fatal: the caller decides whether to abort, reset,
/// or fix its inputs and continue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A physical or capacity parameter was rejected at construction time.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        field: &'static str,
        /// Constraint that was violated.
        reason: String,
    },
    /// A per-step input violated its precondition (e.g. a NaN temperature).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SimError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::config(field, format!("must be > 0, got {value}")))
    }
}

/// Checks that `value` is finite and not negative.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::config(field, format!("must be >= 0, got {value}")))
    }
}
