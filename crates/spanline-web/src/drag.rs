#![forbid(unsafe_code)]

//! Whole-item drag tracking.
//!
//! A small stand-in for a drag-and-drop primitive: pointer-down on an item
//! arms the tracker, movement past a threshold (Manhattan distance) starts
//! the drag, further movement reports the accumulated delta and the row
//! under the pointer, and pointer-up ends it. Escape, pointer-cancel, or
//! blur abandon the drag.
//!
//! Hit testing stays with the host: every move/up carries the row the host
//! found under the pointer, if any.
//!
//! # Invariants
//!
//! 1. At most one pointer is tracked; other pointers are ignored.
//! 2. `DragStart` is emitted exactly once per drag and always precedes any
//!    `DragMove`; every started drag ends with exactly one `DragEnd` or
//!    `DragCancel`.
//! 3. An armed pointer that never crosses the threshold produces no events
//!    (it was a click).

use serde::{Deserialize, Serialize};
use spanline_core::{CancelReason, DataBag, ItemId, PointerButton, PointerInput, RowId, Span};

/// Default drag start distance in pixels.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 3.0;

/// Payload an item hands to the drag primitive.
///
/// Timeline items carry their `span`; items dragged in from outside the
/// timeline carry only a `duration`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DragItemData {
    pub span: Option<Span>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub data: DataBag,
}

impl DragItemData {
    #[must_use]
    pub fn with_span(span: Span) -> Self {
        Self {
            span: Some(span),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }
}

/// The dragged item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDrag {
    pub id: ItemId,
    pub data: DragItemData,
}

/// Pointer displacement since the drag was armed, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragDelta {
    pub x: f64,
    pub y: f64,
}

/// State of a drag at the moment an event was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSnapshot {
    pub active: ActiveDrag,
    pub delta: DragDelta,
    /// Row under the pointer.
    pub over: Option<RowId>,
    /// Screen position of the pointer-down that armed the drag.
    pub activator_x: f64,
    pub activator_y: f64,
}

impl DragSnapshot {
    /// Current screen X of the pointer.
    #[must_use]
    pub fn pointer_x(&self) -> f64 {
        self.activator_x + self.delta.x
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragEvent {
    Start(DragSnapshot),
    Move(DragSnapshot),
    End(DragSnapshot),
    Cancel {
        snapshot: DragSnapshot,
        reason: CancelReason,
    },
}

impl DragEvent {
    #[must_use]
    pub fn snapshot(&self) -> &DragSnapshot {
        match self {
            Self::Start(snapshot) | Self::Move(snapshot) | Self::End(snapshot) => snapshot,
            Self::Cancel { snapshot, .. } => snapshot,
        }
    }
}

/// Pointer capture request for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PointerCaptureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Why the tracker ignored an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    PointerAlreadyTracked,
    NoActivePointer,
    PointerMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Pointer armed; waiting for the threshold.
    Armed,
    /// Below threshold, or a release that never became a drag.
    Pending,
    /// An event was emitted.
    Emitted,
    Ignored(DragIgnoredReason),
}

/// Result of one tracker input.
#[derive(Debug, Clone, PartialEq)]
pub struct DragDispatch {
    pub event: Option<DragEvent>,
    pub capture_command: Option<PointerCaptureCommand>,
    pub outcome: DragOutcome,
}

impl DragDispatch {
    const fn ignored(reason: DragIgnoredReason) -> Self {
        Self {
            event: None,
            capture_command: None,
            outcome: DragOutcome::Ignored(reason),
        }
    }

    fn emitted(event: DragEvent) -> Self {
        Self {
            event: Some(event),
            capture_command: None,
            outcome: DragOutcome::Emitted,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tracked {
    pointer_id: u32,
    active: ActiveDrag,
    origin_x: f64,
    origin_y: f64,
    delta: DragDelta,
    over: Option<RowId>,
    dragging: bool,
}

impl Tracked {
    fn snapshot(&self) -> DragSnapshot {
        DragSnapshot {
            active: self.active.clone(),
            delta: self.delta,
            over: self.over.clone(),
            activator_x: self.origin_x,
            activator_y: self.origin_y,
        }
    }
}

/// Single-pointer drag tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTracker {
    threshold: f64,
    tracked: Option<Tracked>,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragTracker {
    /// Tracker with the given start distance. Non-finite or negative
    /// thresholds fall back to [`DEFAULT_DRAG_THRESHOLD`].
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            DEFAULT_DRAG_THRESHOLD
        };
        Self {
            threshold,
            tracked: None,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.tracked.as_ref().is_some_and(|tracked| tracked.dragging)
    }

    /// Item currently armed or dragged.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveDrag> {
        self.tracked.as_ref().map(|tracked| &tracked.active)
    }

    /// Arm the tracker for `id`.
    pub fn pointer_down(
        &mut self,
        id: ItemId,
        data: DragItemData,
        input: &PointerInput,
    ) -> DragDispatch {
        if input.pointer_id == 0 {
            return DragDispatch::ignored(DragIgnoredReason::InvalidPointerId);
        }
        if input.button != PointerButton::Primary {
            return DragDispatch::ignored(DragIgnoredReason::ButtonNotAllowed);
        }
        if self.tracked.is_some() {
            return DragDispatch::ignored(DragIgnoredReason::PointerAlreadyTracked);
        }
        self.tracked = Some(Tracked {
            pointer_id: input.pointer_id,
            active: ActiveDrag { id, data },
            origin_x: input.client_x,
            origin_y: input.client_y,
            delta: DragDelta::default(),
            over: None,
            dragging: false,
        });
        DragDispatch {
            event: None,
            capture_command: Some(PointerCaptureCommand::Acquire {
                pointer_id: input.pointer_id,
            }),
            outcome: DragOutcome::Armed,
        }
    }

    pub fn pointer_move(&mut self, input: &PointerInput, over: Option<RowId>) -> DragDispatch {
        let threshold = self.threshold;
        let tracked = match self.tracked_for(input.pointer_id) {
            Ok(tracked) => tracked,
            Err(reason) => return DragDispatch::ignored(reason),
        };
        tracked.delta = DragDelta {
            x: input.client_x - tracked.origin_x,
            y: input.client_y - tracked.origin_y,
        };
        tracked.over = over;

        if tracked.dragging {
            return DragDispatch::emitted(DragEvent::Move(tracked.snapshot()));
        }
        if tracked.delta.x.abs() + tracked.delta.y.abs() < threshold {
            return DragDispatch {
                event: None,
                capture_command: None,
                outcome: DragOutcome::Pending,
            };
        }
        tracked.dragging = true;
        tracing::debug!(
            target: "spanline.drag",
            item = %tracked.active.id,
            pointer_id = tracked.pointer_id,
            "drag started"
        );
        DragDispatch::emitted(DragEvent::Start(tracked.snapshot()))
    }

    pub fn pointer_up(&mut self, input: &PointerInput, over: Option<RowId>) -> DragDispatch {
        if let Err(reason) = self.tracked_for(input.pointer_id) {
            return DragDispatch::ignored(reason);
        }
        let Some(mut tracked) = self.tracked.take() else {
            return DragDispatch::ignored(DragIgnoredReason::NoActivePointer);
        };
        let release = Some(PointerCaptureCommand::Release {
            pointer_id: tracked.pointer_id,
        });
        if !tracked.dragging {
            return DragDispatch {
                event: None,
                capture_command: release,
                outcome: DragOutcome::Pending,
            };
        }
        tracked.delta = DragDelta {
            x: input.client_x - tracked.origin_x,
            y: input.client_y - tracked.origin_y,
        };
        tracked.over = over;
        tracing::debug!(
            target: "spanline.drag",
            item = %tracked.active.id,
            delta_x = tracked.delta.x,
            over = ?tracked.over,
            "drag ended"
        );
        DragDispatch {
            event: Some(DragEvent::End(tracked.snapshot())),
            capture_command: release,
            outcome: DragOutcome::Emitted,
        }
    }

    /// Abandon the current drag. Armed pointers are dropped silently.
    pub fn cancel(&mut self, reason: CancelReason) -> DragDispatch {
        let Some(tracked) = self.tracked.take() else {
            return DragDispatch::ignored(DragIgnoredReason::NoActivePointer);
        };
        let release = Some(PointerCaptureCommand::Release {
            pointer_id: tracked.pointer_id,
        });
        if !tracked.dragging {
            return DragDispatch {
                event: None,
                capture_command: release,
                outcome: DragOutcome::Pending,
            };
        }
        tracing::debug!(
            target: "spanline.drag",
            item = %tracked.active.id,
            reason = ?reason,
            "drag canceled"
        );
        DragDispatch {
            event: Some(DragEvent::Cancel {
                snapshot: tracked.snapshot(),
                reason,
            }),
            capture_command: release,
            outcome: DragOutcome::Emitted,
        }
    }

    fn tracked_for(&mut self, pointer_id: u32) -> Result<&mut Tracked, DragIgnoredReason> {
        match self.tracked.as_mut() {
            None => Err(DragIgnoredReason::NoActivePointer),
            Some(tracked) if tracked.pointer_id != pointer_id => {
                Err(DragIgnoredReason::PointerMismatch)
            }
            Some(tracked) => Ok(tracked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tracker() -> DragTracker {
        let mut tracker = DragTracker::default();
        let data = DragItemData::with_span(Span::new(0.0, 10.0).unwrap());
        let armed =
            tracker.pointer_down(ItemId::new("a"), data, &PointerInput::new(1, 100.0, 50.0));
        assert_eq!(armed.outcome, DragOutcome::Armed);
        assert_eq!(
            armed.capture_command,
            Some(PointerCaptureCommand::Acquire { pointer_id: 1 })
        );
        tracker
    }

    #[test]
    fn drag_starts_after_threshold() {
        let mut tracker = tracker();
        let below = tracker.pointer_move(&PointerInput::new(1, 101.0, 51.0), None);
        assert_eq!(below.outcome, DragOutcome::Pending);
        assert!(!tracker.is_dragging());

        let start = tracker.pointer_move(&PointerInput::new(1, 104.0, 50.0), Some(RowId::new("r")));
        assert!(matches!(start.event, Some(DragEvent::Start(_))));
        assert!(tracker.is_dragging());

        let moved = tracker.pointer_move(&PointerInput::new(1, 130.0, 60.0), Some(RowId::new("r")));
        let Some(DragEvent::Move(snapshot)) = moved.event else {
            panic!("expected a move event");
        };
        assert_eq!(snapshot.delta, DragDelta { x: 30.0, y: 10.0 });
        assert_eq!(snapshot.pointer_x(), 130.0);
    }

    #[test]
    fn release_reports_final_row_and_releases_capture() {
        let mut tracker = tracker();
        tracker.pointer_move(&PointerInput::new(1, 120.0, 50.0), Some(RowId::new("r1")));
        let end = tracker.pointer_up(&PointerInput::new(1, 125.0, 80.0), Some(RowId::new("r2")));
        let Some(DragEvent::End(snapshot)) = &end.event else {
            panic!("expected an end event");
        };
        assert_eq!(snapshot.over, Some(RowId::new("r2")));
        assert_eq!(snapshot.delta.x, 25.0);
        assert_eq!(
            end.capture_command,
            Some(PointerCaptureCommand::Release { pointer_id: 1 })
        );
        assert!(tracker.active().is_none());
    }

    #[test]
    fn click_without_drag_emits_nothing() {
        let mut tracker = tracker();
        let up = tracker.pointer_up(&PointerInput::new(1, 100.0, 50.0), None);
        assert_eq!(up.event, None);
        assert_eq!(up.outcome, DragOutcome::Pending);
    }

    #[test]
    fn escape_cancels_active_drag() {
        let mut tracker = tracker();
        tracker.pointer_move(&PointerInput::new(1, 150.0, 50.0), None);
        let canceled = tracker.cancel(CancelReason::EscapeKey);
        assert!(matches!(
            canceled.event,
            Some(DragEvent::Cancel {
                reason: CancelReason::EscapeKey,
                ..
            })
        ));
        assert!(!tracker.is_dragging());
        assert_eq!(
            tracker.cancel(CancelReason::EscapeKey).outcome,
            DragOutcome::Ignored(DragIgnoredReason::NoActivePointer)
        );
    }

    #[test]
    fn foreign_pointers_are_ignored() {
        let mut tracker = tracker();
        assert_eq!(
            tracker
                .pointer_down(
                    ItemId::new("b"),
                    DragItemData::default(),
                    &PointerInput::new(2, 0.0, 0.0)
                )
                .outcome,
            DragOutcome::Ignored(DragIgnoredReason::PointerAlreadyTracked)
        );
        assert_eq!(
            tracker.pointer_move(&PointerInput::new(2, 0.0, 0.0), None).outcome,
            DragOutcome::Ignored(DragIgnoredReason::PointerMismatch)
        );
        assert_eq!(
            tracker.pointer_up(&PointerInput::new(2, 0.0, 0.0), None).outcome,
            DragOutcome::Ignored(DragIgnoredReason::PointerMismatch)
        );
        assert_eq!(tracker.active().map(|a| a.id.as_str()), Some("a"));
    }

    #[test]
    fn secondary_button_does_not_arm() {
        let mut tracker = DragTracker::default();
        let dispatch = tracker.pointer_down(
            ItemId::new("a"),
            DragItemData::with_duration(5.0),
            &PointerInput::new(1, 0.0, 0.0).with_button(PointerButton::Secondary),
        );
        assert_eq!(
            dispatch.outcome,
            DragOutcome::Ignored(DragIgnoredReason::ButtonNotAllowed)
        );
    }

    #[test]
    fn invalid_threshold_falls_back() {
        assert_eq!(DragTracker::new(f64::NAN).threshold(), DEFAULT_DRAG_THRESHOLD);
        assert_eq!(DragTracker::new(0.0).threshold(), 0.0);
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let mut tracker = tracker();
        let start = tracker.pointer_move(&PointerInput::new(1, 200.0, 50.0), None);
        let json = serde_json::to_value(start.event.unwrap()).unwrap();
        assert_eq!(json["kind"], "start");
        assert_eq!(json["active"]["id"], "a");
    }
}
