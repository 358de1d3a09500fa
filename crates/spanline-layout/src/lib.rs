#![forbid(unsafe_code)]

//! Layout: subrow packing, item geometry, and the resize lifecycle.
//!
//! Everything here is a pure function of the data model and a
//! [`spanline_core::CoordinateMapper`]; nothing touches host input or
//! rendering.

pub mod geometry;
pub mod resize;
pub mod subrow;

pub use geometry::{
    ItemContentStyle, ItemGeometry, ItemStyle, RowContentStyle, RowSidebarStyle, RowStyles,
    RowWrapperStyle,
};
pub use resize::{
    ResizeDirection, ResizeEffect, ResizeInput, ResizeMachine, ResizeMachineError,
    ResizeNoopReason, ResizeState, ResizeTransition, classify_resize_edge,
};
pub use subrow::{ItemsByRow, Subrow, SubrowsByRow, group_items_to_rows, group_items_to_subrows};
