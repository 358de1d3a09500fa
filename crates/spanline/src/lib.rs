#![forbid(unsafe_code)]

//! Spanline: headless drag, resize, and pan calculations for interactive
//! timelines.
//!
//! # Role in Spanline
//! This is the facade crate. It wires the pure pieces from
//! `spanline-core`, `spanline-layout`, and `spanline-web` into a
//! [`Timeline`] session with per-item and per-row controllers.
//!
//! # How it fits together
//! 1. The host creates a [`Timeline`] from [`TimelineOptions`], attaches it
//!    to the viewport element, and reports measurements.
//! 2. Every render, the host passes the current range with
//!    [`Timeline::set_range`], packs items with [`group_items_to_subrows`],
//!    and asks [`ItemController`] / [`RowController`] for styles using the
//!    current [`TimelineBag`].
//! 3. Pointer input on items goes to [`ItemController`]; presses that are
//!    not resizes go to a [`DragTracker`]. Completed gestures are turned into
//!    spans with [`Timeline::span_from_drag_event`] and
//!    [`Timeline::span_from_resize_event`]; the host commits them.
//! 4. Wheel input goes to [`Timeline::handle_wheel`], which reports
//!    [`RangeUpdate`]s through `on_range_changed`.

pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod row;
pub mod timeline;

pub use config::{ConfigError, DEFAULT_RESIZE_HANDLE_WIDTH, TimelineConfig};
pub use error::TimelineError;
pub use event::{
    RangeUpdate, ResizeActive, ResizeDelta, ResizeEndEvent, ResizeMoveEvent, ResizeStartEvent,
};
pub use item::{
    HoverCursor, ItemController, ItemIgnoredReason, ItemPointerDispatch, ItemPointerOutcome,
    external_drag_data,
};
pub use row::{Droppable, RowController};
pub use timeline::{
    HostCommand, RangeChangedHandler, ResizeEndHandler, ResizeMoveHandler, ResizeStartHandler,
    SpanDeltaInput, SpanFromDelta, Timeline, TimelineBag, TimelineOptions,
    default_span_from_delta,
};

pub use spanline_core::{
    CancelReason, CoordinateMapper, DataBag, Direction, ElementId, GridSizeDefinition, GridStep,
    InlineSide, ItemDefinition, ItemId, Modifiers, PointerButton, PointerInput, Range, RawItem,
    RowDefinition, RowId, Span, SpanlineError, TimelineRect, WheelInput, snap_to_grid,
    validate_items,
};
pub use spanline_layout::{
    ItemContentStyle, ItemGeometry, ItemStyle, ResizeDirection, RowStyles, group_items_to_rows,
    group_items_to_subrows,
};
pub use spanline_web::{
    DragEvent, DragItemData, DragSnapshot, DragTracker, PanDecision, PanEndEvent, RenderHandle,
    RetainedHandle,
};
