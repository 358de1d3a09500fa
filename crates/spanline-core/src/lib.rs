#![forbid(unsafe_code)]

//! Core: data model, coordinate mapping, grid snapping, and input vocabulary.
//!
//! # Role in Spanline
//! `spanline-core` is the leaf crate. It owns the validated geometry types
//! ([`Range`], [`Span`]), the row/item definitions the host supplies, the
//! pure time ↔ pixel [`CoordinateMapper`], and the canonical pointer/wheel
//! input types every interaction layer consumes.
//!
//! # Primary responsibilities
//! - **Model**: ranges, spans, rows, items, and item validation.
//! - **Mapper**: direction-aware conversion between screen X, pixels, and time.
//! - **Grid**: snapping and range-dependent grid sizes.
//! - **Events**: pointer, wheel, modifier, and cancellation vocabulary.
//!
//! # How it fits in the system
//! `spanline-layout` packs items into subrows and computes item geometry on
//! top of these types; `spanline-web` adapts host input; `spanline` ties them
//! together into a timeline session.

pub mod error;
pub mod event;
pub mod grid;
pub mod mapper;
pub mod model;

pub use error::SpanlineError;
pub use event::{
    CancelReason, Direction, ElementId, InlineSide, Modifiers, PointerButton, PointerInput,
    WheelInput,
};
pub use grid::{GridSizeDefinition, GridStep, snap_to_grid};
pub use mapper::{CoordinateMapper, TimelineRect};
pub use model::{
    DataBag, ItemDefinition, ItemId, ItemRejection, ItemRejectionReason, ItemValidation, Range,
    RawItem, RowDefinition, RowId, Span, validate_items,
};
