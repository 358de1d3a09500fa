#![forbid(unsafe_code)]

//! Validation errors for timeline geometry.

use std::fmt;

/// Errors raised at the data-validation boundary.
///
/// None of these are fatal: callers reject the offending value and keep the
/// previously committed state.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanlineError {
    /// A visible range whose end does not lie strictly after its start.
    EmptyRange { start: f64, end: f64 },
    /// An item span whose end does not lie strictly after its start.
    EmptySpan { start: f64, end: f64 },
    /// A coordinate or time value that is NaN or infinite.
    NonFinite { field: &'static str, value: f64 },
    /// A grid size that is zero, negative, or non-finite.
    InvalidGridSize { value: f64 },
    /// A duration that is zero, negative, or non-finite.
    InvalidDuration { value: f64 },
}

impl fmt::Display for SpanlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange { start, end } => {
                write!(f, "range end must be > start (got start={start}, end={end})")
            }
            Self::EmptySpan { start, end } => {
                write!(f, "span end must be > start (got start={start}, end={end})")
            }
            Self::NonFinite { field, value } => {
                write!(f, "{field} must be finite (got {value})")
            }
            Self::InvalidGridSize { value } => {
                write!(f, "grid size must be finite and > 0 (got {value})")
            }
            Self::InvalidDuration { value } => {
                write!(f, "duration must be finite and > 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for SpanlineError {}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, SpanlineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpanlineError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        let err = SpanlineError::EmptySpan {
            start: 100.0,
            end: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "span end must be > start (got start=100, end=100)"
        );
    }

    #[test]
    fn ensure_finite_rejects_nan() {
        let err = ensure_finite("start", f64::NAN).unwrap_err();
        assert!(matches!(err, SpanlineError::NonFinite { field: "start", .. }));
        assert_eq!(ensure_finite("start", 4.0), Ok(4.0));
    }
}
