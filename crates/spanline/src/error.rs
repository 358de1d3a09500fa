#![forbid(unsafe_code)]

//! Timeline construction errors.

use std::fmt;

use spanline_core::SpanlineError;

/// Errors raised when building or reconfiguring a [`Timeline`](crate::Timeline).
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// A range, grid, or other geometric input failed validation.
    Geometry(SpanlineError),
    /// An option outside its accepted range.
    InvalidOption { field: &'static str, value: f64 },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "invalid geometry: {err}"),
            Self::InvalidOption { field, value } => {
                write!(f, "{field} must be finite and >= 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            Self::InvalidOption { .. } => None,
        }
    }
}

impl From<SpanlineError> for TimelineError {
    fn from(err: SpanlineError) -> Self {
        Self::Geometry(err)
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, TimelineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(TimelineError::InvalidOption { field, value })
    }
}
