#![forbid(unsafe_code)]

//! Canonical pointer and wheel input types.
//!
//! Hosts translate their native events (DOM, winit, terminal mouse) into
//! these values before handing them to a timeline. Coordinates are in the
//! host's screen space, the same space as [`TimelineRect`](crate::mapper::TimelineRect).
//!
//! # Design Notes
//!
//! - `Modifiers` use bitflags for easy combination
//! - Pointer ids are host-assigned; `0` is never a valid id
//! - Element identity is an opaque [`ElementId`]; listeners bound to one
//!   element ignore input tagged with another

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Command/Super key.
        const META  = 0b1000;
    }
}

/// Inline text direction of the timeline container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// `1.0` for left-to-right, `-1.0` for right-to-left.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Ltr => 1.0,
            Self::Rtl => -1.0,
        }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Physical side where the inline start lies.
    #[must_use]
    pub const fn start_side(self) -> InlineSide {
        match self {
            Self::Ltr => InlineSide::Left,
            Self::Rtl => InlineSide::Right,
        }
    }
}

/// Physical horizontal side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineSide {
    Left,
    Right,
}

/// Opaque identity of a host element (viewport, item node, sidebar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// A pointer down/move/up sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub pointer_id: u32,
    pub button: PointerButton,
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// Primary-button sample for pointer `pointer_id` at `(client_x, client_y)`.
    #[must_use]
    pub const fn new(pointer_id: u32, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            button: PointerButton::Primary,
            client_x,
            client_y,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A wheel sample delivered to the viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    /// Element the listener that observed this sample was attached to.
    pub element: ElementId,
    pub client_x: f64,
    pub client_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelInput {
    #[must_use]
    pub const fn new(element: ElementId, client_x: f64, client_y: f64) -> Self {
        Self {
            element,
            client_x,
            client_y,
            delta_x: 0.0,
            delta_y: 0.0,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_delta(mut self, delta_x: f64, delta_y: f64) -> Self {
        self.delta_x = delta_x;
        self.delta_y = delta_y;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether any modifier of `chord` was held.
    #[must_use]
    pub const fn holds_any(&self, chord: Modifiers) -> bool {
        self.modifiers.intersects(chord)
    }
}

/// Why an in-flight gesture was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EscapeKey,
    PointerCancel,
    Blur,
    Unmounted,
    Programmatic,
}
