#![forbid(unsafe_code)]

//! Deterministic resize lifecycle for a single timeline item.
//!
//! ```text
//! Idle -> Resizing -> Idle
//!            \------> Idle (cancel)
//! ```
//!
//! The machine only tracks pointer positions. It reports the logical pixel
//! delta of the grabbed edge (positive = towards inline end), already
//! corrected for right-to-left layouts; converting that delta to time and
//! touching the rendered node is the caller's job.
//!
//! # Invariants
//!
//! 1. Only one pointer drives a resize at a time; input from any other
//!    pointer is a `Noop`.
//! 2. Every `apply` produces exactly one transition with a strictly
//!    increasing `transition_id`.
//! 3. `Committed` and `Canceled` always return the machine to `Idle`.

use std::fmt;

use serde::{Deserialize, Serialize};
use spanline_core::{CancelReason, Direction};

/// Which edge of an item a resize gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    Start,
    End,
}

/// Pick the edge a pointer at `pointer_x` grabs, if any.
///
/// An edge is grabbed when the pointer lies within half of `handle_width`
/// from it. When both edges qualify (narrow items) the nearer one wins, with
/// ties going to the start edge.
#[must_use]
pub fn classify_resize_edge(
    pointer_x: f64,
    start_edge_x: f64,
    end_edge_x: f64,
    handle_width: f64,
) -> Option<ResizeDirection> {
    let reach = handle_width / 2.0;
    let to_start = (pointer_x - start_edge_x).abs();
    let to_end = (pointer_x - end_edge_x).abs();
    match (to_start <= reach, to_end <= reach) {
        (true, true) if to_end < to_start => Some(ResizeDirection::End),
        (true, _) => Some(ResizeDirection::Start),
        (false, true) => Some(ResizeDirection::End),
        (false, false) => None,
    }
}

/// Resize lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResizeState {
    Idle,
    Resizing {
        direction: ResizeDirection,
        text_direction: Direction,
        pointer_id: u32,
        anchor_x: f64,
        current_x: f64,
    },
}

/// Input accepted by [`ResizeMachine::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum ResizeInput {
    /// Pointer pressed on a resize handle.
    Begin {
        direction: ResizeDirection,
        text_direction: Direction,
        pointer_id: u32,
        x: f64,
    },
    Move {
        pointer_id: u32,
        x: f64,
    },
    End {
        pointer_id: u32,
        x: f64,
    },
    Cancel {
        reason: CancelReason,
    },
}

impl ResizeInput {
    fn validate(&self) -> Result<(), ResizeMachineError> {
        let (pointer_id, x) = match *self {
            Self::Begin { pointer_id, x, .. }
            | Self::Move { pointer_id, x }
            | Self::End { pointer_id, x } => (pointer_id, x),
            Self::Cancel { .. } => return Ok(()),
        };
        if pointer_id == 0 {
            return Err(ResizeMachineError::InvalidPointerId);
        }
        if !x.is_finite() {
            return Err(ResizeMachineError::NonFiniteCoordinate { x });
        }
        Ok(())
    }
}

/// Why an input was safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeNoopReason {
    IdleWithoutActiveResize,
    ResizeAlreadyInProgress,
    PointerMismatch,
}

/// Effect of one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ResizeEffect {
    Started {
        direction: ResizeDirection,
        pointer_id: u32,
        anchor_x: f64,
    },
    Updated {
        direction: ResizeDirection,
        pointer_id: u32,
        previous_x: f64,
        current_x: f64,
        total_delta_x: f64,
    },
    Committed {
        direction: ResizeDirection,
        pointer_id: u32,
        anchor_x: f64,
        end_x: f64,
        total_delta_x: f64,
    },
    Canceled {
        direction: Option<ResizeDirection>,
        pointer_id: Option<u32>,
        reason: CancelReason,
    },
    Noop {
        reason: ResizeNoopReason,
    },
}

/// One state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeTransition {
    pub transition_id: u64,
    pub from: ResizeState,
    pub to: ResizeState,
    pub effect: ResizeEffect,
}

/// Lifecycle machine for item resize gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeMachine {
    state: ResizeState,
    transition_counter: u64,
}

impl Default for ResizeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ResizeState::Idle,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ResizeState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Edge being resized, if any.
    #[must_use]
    pub const fn direction(&self) -> Option<ResizeDirection> {
        match self.state {
            ResizeState::Idle => None,
            ResizeState::Resizing { direction, .. } => Some(direction),
        }
    }

    /// Reset to `Idle`, reporting a `Programmatic` cancel if a resize was
    /// in flight. Returns `None` when already idle.
    pub fn force_cancel(&mut self) -> Option<ResizeTransition> {
        if !self.is_active() {
            return None;
        }
        self.apply(ResizeInput::Cancel {
            reason: CancelReason::Programmatic,
        })
        .ok()
    }

    /// Apply one input and report the resulting transition.
    pub fn apply(&mut self, input: ResizeInput) -> Result<ResizeTransition, ResizeMachineError> {
        input.validate()?;

        let from = self.state;
        let effect = match (self.state, input) {
            (
                ResizeState::Idle,
                ResizeInput::Begin {
                    direction,
                    text_direction,
                    pointer_id,
                    x,
                },
            ) => {
                self.state = ResizeState::Resizing {
                    direction,
                    text_direction,
                    pointer_id,
                    anchor_x: x,
                    current_x: x,
                };
                ResizeEffect::Started {
                    direction,
                    pointer_id,
                    anchor_x: x,
                }
            }
            (ResizeState::Idle, _) => ResizeEffect::Noop {
                reason: ResizeNoopReason::IdleWithoutActiveResize,
            },
            (ResizeState::Resizing { .. }, ResizeInput::Begin { .. }) => ResizeEffect::Noop {
                reason: ResizeNoopReason::ResizeAlreadyInProgress,
            },
            (
                ResizeState::Resizing {
                    direction,
                    text_direction,
                    pointer_id,
                    anchor_x,
                    current_x,
                },
                ResizeInput::Move {
                    pointer_id: incoming,
                    x,
                },
            ) => {
                if incoming != pointer_id {
                    ResizeEffect::Noop {
                        reason: ResizeNoopReason::PointerMismatch,
                    }
                } else {
                    self.state = ResizeState::Resizing {
                        direction,
                        text_direction,
                        pointer_id,
                        anchor_x,
                        current_x: x,
                    };
                    ResizeEffect::Updated {
                        direction,
                        pointer_id,
                        previous_x: current_x,
                        current_x: x,
                        total_delta_x: logical_delta(anchor_x, x, text_direction),
                    }
                }
            }
            (
                ResizeState::Resizing {
                    direction,
                    text_direction,
                    pointer_id,
                    anchor_x,
                    ..
                },
                ResizeInput::End {
                    pointer_id: incoming,
                    x,
                },
            ) => {
                if incoming != pointer_id {
                    ResizeEffect::Noop {
                        reason: ResizeNoopReason::PointerMismatch,
                    }
                } else {
                    self.state = ResizeState::Idle;
                    ResizeEffect::Committed {
                        direction,
                        pointer_id,
                        anchor_x,
                        end_x: x,
                        total_delta_x: logical_delta(anchor_x, x, text_direction),
                    }
                }
            }
            (
                ResizeState::Resizing {
                    direction,
                    pointer_id,
                    ..
                },
                ResizeInput::Cancel { reason },
            ) => {
                self.state = ResizeState::Idle;
                ResizeEffect::Canceled {
                    direction: Some(direction),
                    pointer_id: Some(pointer_id),
                    reason,
                }
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        Ok(ResizeTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        })
    }
}

fn logical_delta(anchor_x: f64, x: f64, text_direction: Direction) -> f64 {
    (x - anchor_x) * text_direction.sign()
}

/// Resize machine input errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeMachineError {
    InvalidPointerId,
    NonFiniteCoordinate { x: f64 },
}

impl fmt::Display for ResizeMachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPointerId => write!(f, "pointer id must be non-zero"),
            Self::NonFiniteCoordinate { x } => {
                write!(f, "pointer coordinate must be finite (got {x})")
            }
        }
    }
}

impl std::error::Error for ResizeMachineError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin(direction: ResizeDirection, text_direction: Direction, x: f64) -> ResizeInput {
        ResizeInput::Begin {
            direction,
            text_direction,
            pointer_id: 7,
            x,
        }
    }

    #[test]
    fn classify_prefers_nearer_edge() {
        assert_eq!(
            classify_resize_edge(101.0, 100.0, 300.0, 20.0),
            Some(ResizeDirection::Start)
        );
        assert_eq!(
            classify_resize_edge(295.0, 100.0, 300.0, 20.0),
            Some(ResizeDirection::End)
        );
        assert_eq!(classify_resize_edge(200.0, 100.0, 300.0, 20.0), None);
        // Narrow item: both edges within reach.
        assert_eq!(
            classify_resize_edge(107.0, 100.0, 110.0, 20.0),
            Some(ResizeDirection::End)
        );
        assert_eq!(
            classify_resize_edge(105.0, 100.0, 110.0, 20.0),
            Some(ResizeDirection::Start)
        );
    }

    #[test]
    fn classify_handles_rtl_edge_order() {
        // rtl: start edge is the visual right.
        assert_eq!(
            classify_resize_edge(299.0, 300.0, 100.0, 20.0),
            Some(ResizeDirection::Start)
        );
    }

    #[test]
    fn begin_move_end_reports_logical_delta() {
        let mut machine = ResizeMachine::new();
        let started = machine
            .apply(begin(ResizeDirection::End, Direction::Ltr, 300.0))
            .unwrap();
        assert!(matches!(started.effect, ResizeEffect::Started { .. }));
        assert_eq!(machine.direction(), Some(ResizeDirection::End));

        let moved = machine
            .apply(ResizeInput::Move {
                pointer_id: 7,
                x: 340.0,
            })
            .unwrap();
        assert!(matches!(
            moved.effect,
            ResizeEffect::Updated {
                total_delta_x,
                previous_x,
                ..
            } if total_delta_x == 40.0 && previous_x == 300.0
        ));

        let ended = machine
            .apply(ResizeInput::End {
                pointer_id: 7,
                x: 350.0,
            })
            .unwrap();
        assert!(matches!(
            ended.effect,
            ResizeEffect::Committed { total_delta_x, .. } if total_delta_x == 50.0
        ));
        assert_eq!(machine.state(), ResizeState::Idle);
        assert_eq!(ended.transition_id, 3);
    }

    #[test]
    fn rtl_flips_delta_sign() {
        let mut machine = ResizeMachine::new();
        machine
            .apply(begin(ResizeDirection::Start, Direction::Rtl, 300.0))
            .unwrap();
        let moved = machine
            .apply(ResizeInput::Move {
                pointer_id: 7,
                x: 280.0,
            })
            .unwrap();
        assert!(matches!(
            moved.effect,
            ResizeEffect::Updated { total_delta_x, .. } if total_delta_x == 20.0
        ));
    }

    #[test]
    fn foreign_pointer_is_noop_without_state_change() {
        let mut machine = ResizeMachine::new();
        machine
            .apply(begin(ResizeDirection::End, Direction::Ltr, 0.0))
            .unwrap();
        let before = machine.state();
        let t = machine
            .apply(ResizeInput::Move {
                pointer_id: 8,
                x: 10.0,
            })
            .unwrap();
        assert_eq!(
            t.effect,
            ResizeEffect::Noop {
                reason: ResizeNoopReason::PointerMismatch
            }
        );
        assert_eq!(machine.state(), before);
    }

    #[test]
    fn idle_inputs_are_noops() {
        let mut machine = ResizeMachine::new();
        let t = machine
            .apply(ResizeInput::End {
                pointer_id: 7,
                x: 0.0,
            })
            .unwrap();
        assert_eq!(
            t.effect,
            ResizeEffect::Noop {
                reason: ResizeNoopReason::IdleWithoutActiveResize
            }
        );
        assert!(machine.force_cancel().is_none());
    }

    #[test]
    fn second_begin_is_rejected_while_resizing() {
        let mut machine = ResizeMachine::new();
        machine
            .apply(begin(ResizeDirection::End, Direction::Ltr, 0.0))
            .unwrap();
        let t = machine
            .apply(begin(ResizeDirection::Start, Direction::Ltr, 5.0))
            .unwrap();
        assert_eq!(
            t.effect,
            ResizeEffect::Noop {
                reason: ResizeNoopReason::ResizeAlreadyInProgress
            }
        );
        assert_eq!(machine.direction(), Some(ResizeDirection::End));
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut machine = ResizeMachine::new();
        machine
            .apply(begin(ResizeDirection::Start, Direction::Ltr, 0.0))
            .unwrap();
        let t = machine.force_cancel().unwrap();
        assert!(matches!(
            t.effect,
            ResizeEffect::Canceled {
                reason: CancelReason::Programmatic,
                direction: Some(ResizeDirection::Start),
                ..
            }
        ));
        assert!(!machine.is_active());
    }

    #[test]
    fn invalid_inputs_are_errors() {
        let mut machine = ResizeMachine::new();
        assert_eq!(
            machine.apply(ResizeInput::Begin {
                direction: ResizeDirection::End,
                text_direction: Direction::Ltr,
                pointer_id: 0,
                x: 0.0,
            }),
            Err(ResizeMachineError::InvalidPointerId)
        );
        assert!(matches!(
            machine.apply(ResizeInput::Move {
                pointer_id: 1,
                x: f64::NAN,
            }),
            Err(ResizeMachineError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn transitions_serialize_with_tags() {
        let mut machine = ResizeMachine::new();
        let t = machine
            .apply(begin(ResizeDirection::End, Direction::Ltr, 1.0))
            .unwrap();
        let json = serde_json::to_value(t).unwrap();
        assert_eq!(json["effect"]["effect"], "started");
        assert_eq!(json["to"]["state"], "resizing");
    }
}
