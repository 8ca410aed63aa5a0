//! Error types for model evaluation.

use thiserror::Error;

/// Failure of a model entry point.
///
/// Every variant is local to a single call and recoverable by supplying
/// corrected inputs. Metrics that are merely undefined for valid inputs are
/// not errors; see [`crate::model::types::Metric`] and
/// [`crate::model::types::Payback`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// An input invariant was violated; `field` is the dotted path of the
    /// offending input (e.g. `"assumptions.performance_ratio"`).
    #[error("invalid input: {field} {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },
}

impl ModelError {
    /// Returns the dotted path of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ModelError::InvalidInput { field, .. } => field,
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Checks that `value` is finite and `>= 0`.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ModelError::InvalidInput {
            field,
            message: format!("must be a finite number, got {value}"),
        });
    }
    if value < 0.0 {
        return Err(ModelError::InvalidInput {
            field,
            message: format!("must be >= 0, got {value}"),
        });
    }
    Ok(())
}

/// Checks that `value` is finite and `> 0`.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<()> {
    ensure_non_negative(field, value)?;
    if value == 0.0 {
        return Err(ModelError::InvalidInput {
            field,
            message: "must be > 0".to_string(),
        });
    }
    Ok(())
}
