#![forbid(unsafe_code)]

//! Grid snapping and range-dependent grid sizes.
//!
//! A timeline snaps edited span edges to a grid. The grid may be a single
//! fixed value or a set of steps, each valid while the visible range is
//! narrower than its `max_range_size`; zoomed-in views get finer grids.

use serde::{Deserialize, Serialize};

use crate::error::SpanlineError;
use crate::model::Range;

/// Round `value` to the nearest multiple of `grid_size`.
///
/// Identity when `grid_size` is `None`, zero, negative, or non-finite.
#[must_use]
pub fn snap_to_grid(value: f64, grid_size: Option<f64>) -> f64 {
    match grid_size {
        Some(grid) if grid.is_finite() && grid > 0.0 => (value / grid).round() * grid,
        _ => value,
    }
}

/// One entry of a stepped grid definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStep {
    /// Grid size applied while this step is selected.
    pub value: f64,
    /// Exclusive upper bound on the range width for this step. `None` matches
    /// every range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_range_size: Option<f64>,
}

impl GridStep {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            max_range_size: None,
        }
    }

    #[must_use]
    pub const fn below(mut self, max_range_size: f64) -> Self {
        self.max_range_size = Some(max_range_size);
        self
    }

    fn matches(&self, range_size: f64) -> bool {
        self.max_range_size.is_none_or(|max| range_size < max)
    }
}

/// How the grid size is chosen for the current range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSizeDefinition {
    /// No snapping.
    #[default]
    None,
    /// A single grid size regardless of zoom.
    Fixed(f64),
    /// Grid size chosen from the range width.
    Steps(Vec<GridStep>),
}

impl GridSizeDefinition {
    /// Reject non-positive or non-finite grid values.
    pub fn validate(&self) -> Result<(), SpanlineError> {
        let check = |value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SpanlineError::InvalidGridSize { value })
            }
        };
        match self {
            Self::None => Ok(()),
            Self::Fixed(value) => check(*value),
            Self::Steps(steps) => steps.iter().try_for_each(|step| check(step.value)),
        }
    }

    /// Grid size for `range`.
    ///
    /// For stepped definitions the smallest step value whose bound admits the
    /// range width wins; `None` if no step matches.
    #[must_use]
    pub fn resolve(&self, range: &Range) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Fixed(value) => Some(*value),
            Self::Steps(steps) => {
                let range_size = range.duration();
                let mut sorted: Vec<&GridStep> = steps.iter().collect();
                sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
                sorted
                    .into_iter()
                    .find(|step| step.matches(range_size))
                    .map(|step| step.value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: f64 = 60_000.0;
    const HOUR: f64 = 60.0 * MINUTE;

    fn range(width: f64) -> Range {
        Range::new(0.0, width).unwrap()
    }

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(snap_to_grid(124.0, Some(50.0)), 100.0);
        assert_eq!(snap_to_grid(125.0, Some(50.0)), 150.0);
        assert_eq!(snap_to_grid(-74.0, Some(50.0)), -50.0);
    }

    #[test]
    fn snap_without_grid_is_identity() {
        assert_eq!(snap_to_grid(123.4, None), 123.4);
        assert_eq!(snap_to_grid(123.4, Some(0.0)), 123.4);
        assert_eq!(snap_to_grid(123.4, Some(f64::NAN)), 123.4);
    }

    #[test]
    fn steps_pick_finest_matching_grid() {
        let def = GridSizeDefinition::Steps(vec![
            GridStep::new(HOUR),
            GridStep::new(5.0 * MINUTE).below(6.0 * HOUR),
            GridStep::new(MINUTE).below(HOUR),
        ]);
        assert_eq!(def.resolve(&range(30.0 * MINUTE)), Some(MINUTE));
        assert_eq!(def.resolve(&range(2.0 * HOUR)), Some(5.0 * MINUTE));
        assert_eq!(def.resolve(&range(24.0 * HOUR)), Some(HOUR));
    }

    #[test]
    fn steps_without_catch_all_can_resolve_to_none() {
        let def = GridSizeDefinition::Steps(vec![GridStep::new(MINUTE).below(HOUR)]);
        assert_eq!(def.resolve(&range(2.0 * HOUR)), None);
    }

    #[test]
    fn validate_rejects_zero_step() {
        let def = GridSizeDefinition::Steps(vec![GridStep::new(0.0)]);
        assert!(matches!(
            def.validate(),
            Err(SpanlineError::InvalidGridSize { .. })
        ));
        assert!(GridSizeDefinition::Fixed(50.0).validate().is_ok());
    }

    #[test]
    fn untagged_serde_accepts_number_or_list() {
        let fixed: GridSizeDefinition = serde_json::from_str("50.0").unwrap();
        assert_eq!(fixed, GridSizeDefinition::Fixed(50.0));
        let steps: GridSizeDefinition =
            serde_json::from_str(r#"[{"value":1.0,"max_range_size":10.0},{"value":5.0}]"#)
                .unwrap();
        assert_eq!(
            steps,
            GridSizeDefinition::Steps(vec![GridStep::new(1.0).below(10.0), GridStep::new(5.0)])
        );
    }
}
