#![forbid(unsafe_code)]

//! Timeline data model: ranges, spans, rows, and items.
//!
//! Every constructor here validates its geometry, so a [`Range`] or [`Span`]
//! that exists always satisfies `end > start` with finite bounds. Raw host
//! data enters through [`validate_items`], which splits it into accepted
//! definitions and explicit rejections.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SpanlineError, ensure_finite};

/// Free-form key/value payload carried by rows, items, and their events.
pub type DataBag = BTreeMap<String, String>;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(
    /// Identity of a timeline row (lane).
    RowId
);
string_id!(
    /// Identity of a timeline item.
    ItemId
);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct RawInterval {
    start: f64,
    end: f64,
}

/// The visible time window of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Range {
    start: f64,
    end: f64,
}

impl Range {
    /// Create a range, rejecting non-finite bounds and `end <= start`.
    pub fn new(start: f64, end: f64) -> Result<Self, SpanlineError> {
        let start = ensure_finite("range.start", start)?;
        let end = ensure_finite("range.end", end)?;
        if end <= start {
            return Err(SpanlineError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Width of the window in time units. Always positive.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether any part of `span` is visible.
    ///
    /// Spans that merely touch the window edge are treated as outside.
    #[must_use]
    pub fn intersects(&self, span: &Span) -> bool {
        span.end > self.start && span.start < self.end
    }
}

impl TryFrom<RawInterval> for Range {
    type Error = SpanlineError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<Range> for RawInterval {
    fn from(range: Range) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// The time interval occupied by an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Span {
    start: f64,
    end: f64,
}

impl Span {
    /// Create a span, rejecting non-finite bounds and `end <= start`.
    pub fn new(start: f64, end: f64) -> Result<Self, SpanlineError> {
        let start = ensure_finite("span.start", start)?;
        let end = ensure_finite("span.end", end)?;
        if end <= start {
            return Err(SpanlineError::EmptySpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a span from a start and a positive duration.
    pub fn from_duration(start: f64, duration: f64) -> Result<Self, SpanlineError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SpanlineError::InvalidDuration { value: duration });
        }
        Self::new(start, start + duration)
    }

    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the two spans share any time. Touching spans do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Shift both ends by `delta`.
    pub fn translate(&self, delta: f64) -> Result<Self, SpanlineError> {
        Self::new(self.start + delta, self.end + delta)
    }
}

impl TryFrom<RawInterval> for Span {
    type Error = SpanlineError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<Span> for RawInterval {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// A lane of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDefinition {
    pub id: RowId,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: DataBag,
}

impl RowDefinition {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            disabled: false,
            data: DataBag::new(),
        }
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// An interval placed on a row.
///
/// `row_id` is a weak reference: an item pointing at a row that does not
/// exist is simply not rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub row_id: RowId,
    pub span: Span,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: DataBag,
}

impl ItemDefinition {
    pub fn new(id: impl Into<ItemId>, row_id: impl Into<RowId>, span: Span) -> Self {
        Self {
            id: id.into(),
            row_id: row_id.into(),
            span,
            disabled: false,
            data: DataBag::new(),
        }
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Unvalidated item data as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub id: ItemId,
    pub row_id: RowId,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: DataBag,
}

impl RawItem {
    pub fn new(id: impl Into<ItemId>, row_id: impl Into<RowId>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            row_id: row_id.into(),
            start,
            end,
            disabled: false,
            data: DataBag::new(),
        }
    }
}

/// Why an item was refused by [`validate_items`].
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRejectionReason {
    Geometry(SpanlineError),
    DuplicateId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRejection {
    pub id: ItemId,
    pub reason: ItemRejectionReason,
}

/// Outcome of [`validate_items`]. Accepted items keep their input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemValidation {
    pub accepted: Vec<ItemDefinition>,
    pub rejected: Vec<ItemRejection>,
}

impl ItemValidation {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Split raw host items into valid definitions and rejections.
///
/// An item is rejected when its span is empty or non-finite, or when an
/// earlier item already claimed its id.
pub fn validate_items(items: impl IntoIterator<Item = RawItem>) -> ItemValidation {
    let mut seen = BTreeSet::new();
    let mut out = ItemValidation::default();
    for raw in items {
        if seen.contains(&raw.id) {
            out.rejected.push(ItemRejection {
                id: raw.id,
                reason: ItemRejectionReason::DuplicateId,
            });
            continue;
        }
        match Span::new(raw.start, raw.end) {
            Ok(span) => {
                seen.insert(raw.id.clone());
                out.accepted.push(ItemDefinition {
                    id: raw.id,
                    row_id: raw.row_id,
                    span,
                    disabled: raw.disabled,
                    data: raw.data,
                });
            }
            Err(error) => out.rejected.push(ItemRejection {
                id: raw.id,
                reason: ItemRejectionReason::Geometry(error),
            }),
        }
    }
    out
}
