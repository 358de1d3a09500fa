#![forbid(unsafe_code)]

//! Time ↔ pixel conversion for a measured timeline.
//!
//! A [`CoordinateMapper`] is a pure value: it captures the visible range, the
//! timeline's bounding box, the sidebar width, the direction, and the active
//! grid size, and converts between time values and pixels. Hosts never mutate
//! one; a new mapper is built whenever any input changes.
//!
//! # Geometry
//!
//! ```text
//!  rect.left                                         rect.right
//!  |<- sidebar ->|<-------------- viewport ------------->|      (ltr)
//!  |<-------------- viewport ------------->|<- sidebar ->|      (rtl)
//! ```
//!
//! The viewport is the timeline width minus the sidebar width; `range.start`
//! sits at the viewport's inline-start edge.

use serde::{Deserialize, Serialize};

use crate::event::{Direction, InlineSide};
use crate::grid::snap_to_grid;
use crate::model::Range;

/// Bounding box of the timeline container in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineRect {
    pub left: f64,
    pub width: f64,
}

impl TimelineRect {
    #[must_use]
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn edge(&self, side: InlineSide) -> f64 {
        match side {
            InlineSide::Left => self.left,
            InlineSide::Right => self.right(),
        }
    }
}

/// Pure conversion functions for one range and one viewport measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    range: Range,
    rect: TimelineRect,
    sidebar_width: f64,
    direction: Direction,
    grid_size: Option<f64>,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(
        range: Range,
        rect: TimelineRect,
        sidebar_width: f64,
        direction: Direction,
        grid_size: Option<f64>,
    ) -> Self {
        Self {
            range,
            rect,
            sidebar_width: sidebar_width.max(0.0),
            direction,
            grid_size,
        }
    }

    /// Mapper over a bare viewport width, with no sidebar and origin at 0.
    #[must_use]
    pub fn for_viewport(range: Range, viewport_width: f64) -> Self {
        Self::new(
            range,
            TimelineRect::new(0.0, viewport_width),
            0.0,
            Direction::Ltr,
            None,
        )
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub const fn rect(&self) -> TimelineRect {
        self.rect
    }

    #[must_use]
    pub const fn sidebar_width(&self) -> f64 {
        self.sidebar_width
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn grid_size(&self) -> Option<f64> {
        self.grid_size
    }

    /// Timeline width minus sidebar width, never negative.
    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        (self.rect.width - self.sidebar_width).max(0.0)
    }

    #[must_use]
    pub fn value_to_pixels(&self, value: f64) -> f64 {
        self.value_to_pixels_in(value, &self.range)
    }

    /// Convert against a caller-supplied range instead of the visible one.
    #[must_use]
    pub fn value_to_pixels_in(&self, value: f64, range: &Range) -> f64 {
        value * (self.viewport_width() / range.duration())
    }

    /// Convert a pixel length to a time length.
    ///
    /// Returns `0.0` while the viewport has no width, since no pixel maps to
    /// any time yet.
    #[must_use]
    pub fn pixels_to_value(&self, pixels: f64) -> f64 {
        self.pixels_to_value_in(pixels, &self.range)
    }

    #[must_use]
    pub fn pixels_to_value_in(&self, pixels: f64, range: &Range) -> f64 {
        let viewport = self.viewport_width();
        if viewport <= 0.0 {
            return 0.0;
        }
        pixels * (range.duration() / viewport)
    }

    /// Screen X of the viewport's inline-start edge.
    #[must_use]
    pub fn viewport_start_x(&self) -> f64 {
        self.rect.edge(self.direction.start_side()) + self.sidebar_width * self.direction.sign()
    }

    /// Inline-start-relative pixel offset of `screen_x` inside the viewport.
    #[must_use]
    pub fn delta_x_from_screen_x(&self, screen_x: f64) -> f64 {
        (screen_x - self.viewport_start_x()) * self.direction.sign()
    }

    /// Time value under `screen_x`. Not snapped.
    #[must_use]
    pub fn value_from_screen_x(&self, screen_x: f64) -> f64 {
        self.range.start() + self.pixels_to_value(self.delta_x_from_screen_x(screen_x))
    }

    /// Snap to the grid active for this mapper.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        snap_to_grid(value, self.grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: f64, end: f64) -> Range {
        Range::new(start, end).unwrap()
    }

    #[test]
    fn half_the_range_is_half_the_viewport() {
        let mapper = CoordinateMapper::for_viewport(range(0.0, 1000.0), 500.0);
        assert_eq!(mapper.value_to_pixels(500.0), 250.0);
        assert_eq!(mapper.pixels_to_value(250.0), 500.0);
    }

    #[test]
    fn custom_range_overrides_visible_range() {
        let mapper = CoordinateMapper::for_viewport(range(0.0, 1000.0), 500.0);
        assert_eq!(mapper.value_to_pixels_in(500.0, &range(0.0, 500.0)), 500.0);
    }

    #[test]
    fn zero_width_viewport_maps_pixels_to_zero() {
        let mapper = CoordinateMapper::for_viewport(range(0.0, 1000.0), 0.0);
        assert_eq!(mapper.pixels_to_value(10.0), 0.0);
        assert_eq!(mapper.value_to_pixels(10.0), 0.0);
    }

    #[test]
    fn screen_x_accounts_for_sidebar_ltr() {
        let mapper = CoordinateMapper::new(
            range(1000.0, 2000.0),
            TimelineRect::new(100.0, 600.0),
            100.0,
            Direction::Ltr,
            None,
        );
        // Viewport spans screen x 200..700 for 1000 time units.
        assert_eq!(mapper.viewport_width(), 500.0);
        assert_eq!(mapper.value_from_screen_x(200.0), 1000.0);
        assert_eq!(mapper.value_from_screen_x(450.0), 1500.0);
        assert_eq!(mapper.value_from_screen_x(150.0), 900.0);
    }

    #[test]
    fn screen_x_flips_in_rtl() {
        let mapper = CoordinateMapper::new(
            range(0.0, 1000.0),
            TimelineRect::new(100.0, 600.0),
            100.0,
            Direction::Rtl,
            None,
        );
        // Sidebar occupies 600..700; viewport start is at screen x 600.
        assert_eq!(mapper.viewport_start_x(), 600.0);
        assert_eq!(mapper.value_from_screen_x(600.0), 0.0);
        assert_eq!(mapper.value_from_screen_x(350.0), 500.0);
        assert_eq!(mapper.delta_x_from_screen_x(100.0), 500.0);
    }

    #[test]
    fn snap_uses_configured_grid() {
        let mapper = CoordinateMapper::new(
            range(0.0, 1000.0),
            TimelineRect::new(0.0, 500.0),
            0.0,
            Direction::Ltr,
            Some(50.0),
        );
        assert_eq!(mapper.snap(1074.0), 1050.0);
        assert_eq!(mapper.grid_size(), Some(50.0));
    }
}
