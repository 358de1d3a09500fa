#![forbid(unsafe_code)]

//! Wheel pan strategy and its element-scoped listener.
//!
//! A pan strategy looks at one wheel sample and decides whether the timeline
//! claims it (`prevent_default`) and, if so, which pan/zoom delta it stands
//! for. Deltas are in screen pixels; the timeline converts them to time.
//!
//! The default strategy only reacts to the platform zoom chord (Ctrl or
//! Meta). Shift turns the gesture into a horizontal pan; without Shift the
//! vertical delta is reported for zooming.
//!
//! # Failure Modes
//!
//! - Wheel samples tagged with an element other than the attached one are
//!   dropped. A listener left over from a previous viewport can therefore
//!   never move the range.

use serde::{Deserialize, Serialize};
use spanline_core::{ElementId, Modifiers, WheelInput};

/// A completed pan/zoom gesture in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanEndEvent {
    /// Horizontal translation.
    pub delta_x: f64,
    /// Zoom amount; positive narrows the range (zooms in).
    pub delta_y: f64,
    /// Cursor position used to anchor zooming.
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
}

/// What a strategy decided for one wheel sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanDecision {
    /// Host should suppress native scrolling for this sample.
    pub prevent_default: bool,
    pub pan: Option<PanEndEvent>,
}

impl PanDecision {
    /// Leave the sample to the host.
    #[must_use]
    pub const fn pass_through() -> Self {
        Self {
            prevent_default: false,
            pan: None,
        }
    }
}

/// Pluggable pan strategy.
pub type PanStrategy = Box<dyn Fn(&WheelInput) -> PanDecision>;

/// Modifier chords recognised by [`configured_pan_strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanModifiers {
    /// Any of these held activates the strategy.
    pub activate: Modifiers,
    /// Any of these held switches to horizontal panning.
    pub horizontal: Modifiers,
}

impl Default for PanModifiers {
    fn default() -> Self {
        Self {
            activate: Modifiers::CTRL | Modifiers::META,
            horizontal: Modifiers::SHIFT,
        }
    }
}

impl PanModifiers {
    fn decide(&self, input: &WheelInput) -> PanDecision {
        if !input.holds_any(self.activate) {
            return PanDecision::pass_through();
        }
        let pan = if input.holds_any(self.horizontal) {
            let delta_x = if input.delta_x == 0.0 {
                input.delta_y
            } else {
                input.delta_x
            };
            PanEndEvent {
                delta_x,
                delta_y: 0.0,
                client_x: Some(input.client_x),
                client_y: Some(input.client_y),
            }
        } else {
            PanEndEvent {
                delta_x: 0.0,
                delta_y: input.delta_y,
                client_x: Some(input.client_x),
                client_y: Some(input.client_y),
            }
        };
        PanDecision {
            prevent_default: true,
            pan: Some(pan),
        }
    }
}

/// Default strategy: Ctrl/Meta + wheel zooms, adding Shift pans.
#[must_use]
pub fn wheel_pan_strategy(input: &WheelInput) -> PanDecision {
    PanModifiers::default().decide(input)
}

#[must_use]
pub fn default_pan_strategy() -> PanStrategy {
    Box::new(wheel_pan_strategy)
}

/// Strategy with custom modifier chords.
#[must_use]
pub fn configured_pan_strategy(modifiers: PanModifiers) -> PanStrategy {
    Box::new(move |input| modifiers.decide(input))
}

/// Listener lifecycle command for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ListenerCommand {
    /// Register a non-passive wheel listener on `element`.
    Attach { element: ElementId },
    Detach { element: ElementId },
}

/// A pan strategy bound to one viewport element at a time.
pub struct PanListener {
    strategy: PanStrategy,
    element: Option<ElementId>,
}

impl std::fmt::Debug for PanListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanListener")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl Default for PanListener {
    fn default() -> Self {
        Self::new(default_pan_strategy())
    }
}

impl PanListener {
    #[must_use]
    pub fn new(strategy: PanStrategy) -> Self {
        Self {
            strategy,
            element: None,
        }
    }

    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Bind to `element`, detaching from any previous element first.
    ///
    /// Re-attaching to the current element emits nothing.
    pub fn attach(&mut self, element: ElementId) -> Vec<ListenerCommand> {
        match self.element.replace(element) {
            Some(previous) if previous == element => Vec::new(),
            Some(previous) => vec![
                ListenerCommand::Detach { element: previous },
                ListenerCommand::Attach { element },
            ],
            None => vec![ListenerCommand::Attach { element }],
        }
    }

    pub fn detach(&mut self) -> Option<ListenerCommand> {
        self.element
            .take()
            .map(|element| ListenerCommand::Detach { element })
    }

    /// Run the strategy for a wheel sample.
    ///
    /// Returns `None` when the sample came from an element this listener is
    /// not attached to.
    pub fn handle_wheel(&self, input: &WheelInput) -> Option<PanDecision> {
        if self.element != Some(input.element) {
            tracing::debug!(
                target: "spanline.pan",
                element = input.element.0,
                attached = ?self.element,
                "wheel from stale element dropped"
            );
            return None;
        }
        Some((self.strategy)(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ElementId = ElementId(1);

    fn wheel(modifiers: Modifiers, dx: f64, dy: f64) -> WheelInput {
        WheelInput::new(VIEWPORT, 40.0, 12.0)
            .with_delta(dx, dy)
            .with_modifiers(modifiers)
    }

    #[test]
    fn plain_wheel_is_left_to_host() {
        assert_eq!(
            wheel_pan_strategy(&wheel(Modifiers::NONE, 5.0, 5.0)),
            PanDecision::pass_through()
        );
        assert_eq!(
            wheel_pan_strategy(&wheel(Modifiers::SHIFT, 5.0, 5.0)),
            PanDecision::pass_through()
        );
    }

    #[test]
    fn ctrl_wheel_zooms_with_cursor() {
        let decision = wheel_pan_strategy(&wheel(Modifiers::CTRL, 3.0, -20.0));
        assert!(decision.prevent_default);
        let pan = decision.pan.unwrap();
        assert_eq!(pan.delta_x, 0.0);
        assert_eq!(pan.delta_y, -20.0);
        assert_eq!(pan.client_x, Some(40.0));
    }

    #[test]
    fn shift_pans_horizontally_with_vertical_fallback() {
        let with_x = wheel_pan_strategy(&wheel(Modifiers::META | Modifiers::SHIFT, 7.0, 30.0));
        assert_eq!(with_x.pan.unwrap().delta_x, 7.0);
        assert_eq!(with_x.pan.unwrap().delta_y, 0.0);

        let only_y = wheel_pan_strategy(&wheel(Modifiers::CTRL | Modifiers::SHIFT, 0.0, 30.0));
        assert_eq!(only_y.pan.unwrap().delta_x, 30.0);
    }

    #[test]
    fn configured_chords_replace_defaults() {
        let strategy = configured_pan_strategy(PanModifiers {
            activate: Modifiers::ALT,
            horizontal: Modifiers::SHIFT,
        });
        assert!(!strategy(&wheel(Modifiers::CTRL, 0.0, 1.0)).prevent_default);
        assert!(strategy(&wheel(Modifiers::ALT, 0.0, 1.0)).prevent_default);
    }

    #[test]
    fn listener_commands_follow_element_identity() {
        let mut listener = PanListener::default();
        assert_eq!(
            listener.attach(VIEWPORT),
            vec![ListenerCommand::Attach { element: VIEWPORT }]
        );
        assert!(listener.attach(VIEWPORT).is_empty());
        assert_eq!(
            listener.attach(ElementId(2)),
            vec![
                ListenerCommand::Detach { element: VIEWPORT },
                ListenerCommand::Attach {
                    element: ElementId(2)
                },
            ]
        );
        assert_eq!(
            listener.detach(),
            Some(ListenerCommand::Detach {
                element: ElementId(2)
            })
        );
        assert_eq!(listener.detach(), None);
    }

    #[test]
    fn stale_element_input_is_dropped() {
        let mut listener = PanListener::default();
        assert!(listener.handle_wheel(&wheel(Modifiers::CTRL, 0.0, 1.0)).is_none());
        listener.attach(ElementId(9));
        assert!(listener.handle_wheel(&wheel(Modifiers::CTRL, 0.0, 1.0)).is_none());
        listener.attach(VIEWPORT);
        assert!(listener.handle_wheel(&wheel(Modifiers::CTRL, 0.0, 1.0)).is_some());
    }
}
