#![forbid(unsafe_code)]

//! Events a timeline reports to the host.

use serde::{Deserialize, Serialize};
use spanline_core::{DataBag, ItemId, Range, Span};
use spanline_layout::ResizeDirection;

/// The item being resized, as it was when the gesture began.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeActive {
    pub id: ItemId,
    pub span: Span,
    #[serde(default)]
    pub data: DataBag,
}

/// Logical pixel movement of the grabbed edge (positive = towards inline end).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResizeDelta {
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeStartEvent {
    pub active: ResizeActive,
    pub direction: ResizeDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeMoveEvent {
    pub active: ResizeActive,
    pub delta: ResizeDelta,
    pub direction: ResizeDirection,
    /// Span currently previewed on the render handle, if the delta produced
    /// a valid one.
    pub preview: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeEndEvent {
    pub active: ResizeActive,
    pub delta: ResizeDelta,
    pub direction: ResizeDirection,
}

/// A requested change of the visible range, in time units.
///
/// Produced by a completed pan or zoom gesture and handed to the host, which
/// owns the range and decides whether to apply it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeUpdate {
    pub start_delta: f64,
    pub end_delta: f64,
}

impl RangeUpdate {
    /// Pure translation by `delta`.
    #[must_use]
    pub const fn translate(delta: f64) -> Self {
        Self {
            start_delta: delta,
            end_delta: delta,
        }
    }

    /// `previous` moved by this update, or `None` if the result would not be
    /// a valid range.
    #[must_use]
    pub fn try_apply(&self, previous: &Range) -> Option<Range> {
        Range::new(
            previous.start() + self.start_delta,
            previous.end() + self.end_delta,
        )
        .ok()
    }

    /// `previous` moved by this update; an update that would collapse or
    /// invert the range leaves it unchanged.
    #[must_use]
    pub fn apply(&self, previous: &Range) -> Range {
        self.try_apply(previous).unwrap_or(*previous)
    }
}
