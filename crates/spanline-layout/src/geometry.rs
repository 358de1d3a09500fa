#![forbid(unsafe_code)]

//! Item and row geometry derived from a [`CoordinateMapper`].
//!
//! Offsets are measured from the viewport's inline-start edge, so the same
//! numbers serve both directions; [`ItemStyle::side`] tells the host which
//! physical side the offset applies to.

use serde::{Deserialize, Serialize};
use spanline_core::{CoordinateMapper, Direction, InlineSide, Span};

/// Inline-start offset and width of a rendered item, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemGeometry {
    pub offset: f64,
    pub width: f64,
}

impl ItemGeometry {
    #[must_use]
    pub const fn new(offset: f64, width: f64) -> Self {
        Self { offset, width }
    }

    /// Geometry of `span` under `mapper`.
    #[must_use]
    pub fn of_span(span: &Span, mapper: &CoordinateMapper) -> Self {
        Self {
            offset: mapper.value_to_pixels(span.start() - mapper.range().start()),
            width: mapper.value_to_pixels(span.duration()),
        }
    }

    /// Inline-end offset (`offset + width`).
    #[must_use]
    pub fn end_offset(&self) -> f64 {
        self.offset + self.width
    }

    /// Screen X of the item's inline-start and inline-end edges.
    ///
    /// In right-to-left layouts the start edge is the visual right edge.
    #[must_use]
    pub fn screen_edges(&self, mapper: &CoordinateMapper) -> (f64, f64) {
        let origin = mapper.viewport_start_x();
        let sign = mapper.direction().sign();
        (origin + self.offset * sign, origin + self.end_offset() * sign)
    }
}

/// Absolute positioning for an item node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStyle {
    /// Physical side that `geometry.offset` is measured from.
    pub side: InlineSide,
    pub geometry: ItemGeometry,
}

impl ItemStyle {
    #[must_use]
    pub fn of_span(span: &Span, mapper: &CoordinateMapper) -> Self {
        Self {
            side: mapper.direction().start_side(),
            geometry: ItemGeometry::of_span(span, mapper),
        }
    }
}

/// Inline padding that keeps item content inside the visible range when the
/// item is clipped by either edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemContentStyle {
    pub padding_inline_start: f64,
    pub padding_inline_end: f64,
}

impl ItemContentStyle {
    #[must_use]
    pub fn of_span(span: &Span, mapper: &CoordinateMapper) -> Self {
        let range = mapper.range();
        let clipped_start = (range.start() - span.start()).max(0.0);
        let clipped_end = (span.end() - range.end()).max(0.0);
        Self {
            padding_inline_start: mapper.value_to_pixels(clipped_start),
            padding_inline_end: mapper.value_to_pixels(clipped_end),
        }
    }
}

/// Outer row container: sidebar and content laid out inline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowWrapperStyle {
    pub direction: Direction,
}

/// Positioning context for a row's items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowContentStyle {
    pub width: f64,
}

/// Sidebar cell of a row. `width` is `None` while the sidebar sizes itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowSidebarStyle {
    pub side: InlineSide,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStyles {
    pub wrapper: RowWrapperStyle,
    pub content: RowContentStyle,
    pub sidebar: RowSidebarStyle,
}

impl RowStyles {
    /// Row styles for the current mapper.
    ///
    /// `controlled_sidebar_width` pins the sidebar; without it the sidebar
    /// keeps its natural width and reports it back for auto-sizing.
    #[must_use]
    pub fn new(mapper: &CoordinateMapper, controlled_sidebar_width: Option<f64>) -> Self {
        Self {
            wrapper: RowWrapperStyle {
                direction: mapper.direction(),
            },
            content: RowContentStyle {
                width: mapper.viewport_width(),
            },
            sidebar: RowSidebarStyle {
                side: mapper.direction().start_side(),
                width: controlled_sidebar_width,
            },
        }
    }
}
