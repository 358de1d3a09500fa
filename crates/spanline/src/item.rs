#![forbid(unsafe_code)]

//! Per-item controller: styles, drag payload, and the resize gesture.
//!
//! An [`ItemController`] lives as long as its rendered item. Pointer input
//! that lands on the item goes through [`ItemController::pointer_down`]:
//! presses near an edge start a resize, everything else is forwarded to the
//! drag tracker.
//!
//! While resizing, the preview is written straight to the item's
//! [`RenderHandle`]; the host's item list is not touched until the host
//! commits the span carried by [`ResizeEndEvent`].
//!
//! # Invariants
//!
//! 1. Disabled items never start a resize and are never draggable.
//! 2. The handle always ends a gesture showing the item's current span, on
//!    release as well as on cancel. The resized span only reaches the
//!    handle once the host commits it and re-renders.
//! 3. `on_resize_end` fires exactly once per completed resize and never for
//!    a canceled one.

use serde::{Deserialize, Serialize};
use spanline_core::{
    CancelReason, DataBag, ItemDefinition, ItemId, PointerButton, PointerInput, Span,
};
use spanline_layout::{
    ItemContentStyle, ItemGeometry, ItemStyle, ResizeDirection, ResizeEffect, ResizeInput,
    ResizeMachine, ResizeMachineError, ResizeNoopReason, ResizeTransition, classify_resize_edge,
};
use spanline_web::{DragItemData, RenderHandle};

use crate::event::{ResizeActive, ResizeDelta, ResizeEndEvent, ResizeMoveEvent, ResizeStartEvent};
use crate::timeline::TimelineBag;

/// Cursor the host should show while hovering an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverCursor {
    Default,
    Grab,
    ResizeStart,
    ResizeEnd,
}

impl HoverCursor {
    const fn for_direction(direction: ResizeDirection) -> Self {
        match direction {
            ResizeDirection::Start => Self::ResizeStart,
            ResizeDirection::End => Self::ResizeEnd,
        }
    }
}

/// Why an item ignored a pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemIgnoredReason {
    Disabled,
    InvalidInput(ResizeMachineError),
    Machine(ResizeNoopReason),
    /// The machine answered with an effect the input cannot produce.
    UnexpectedEffect(ResizeEffect),
}

/// What a pointer input did to the item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemPointerOutcome {
    /// Not a resize; hand the input to the drag tracker.
    ForwardToDrag,
    ResizeStarted {
        direction: ResizeDirection,
    },
    ResizeUpdated {
        /// Span written to the handle; `None` when the delta produced an
        /// invalid span and the previous preview was kept.
        preview: Option<Span>,
    },
    ResizeCommitted {
        event: ResizeEndEvent,
        /// Span the item should be committed with, if valid.
        span: Option<Span>,
    },
    ResizeCanceled {
        reason: CancelReason,
    },
    Ignored(ItemIgnoredReason),
}

/// Result of one item pointer input.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPointerDispatch {
    pub transition: Option<ResizeTransition>,
    pub outcome: ItemPointerOutcome,
}

impl ItemPointerDispatch {
    const fn outcome(outcome: ItemPointerOutcome) -> Self {
        Self {
            transition: None,
            outcome,
        }
    }

    const fn ignored(reason: ItemIgnoredReason) -> Self {
        Self::outcome(ItemPointerOutcome::Ignored(reason))
    }
}

/// Controller for one rendered item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemController {
    definition: ItemDefinition,
    machine: ResizeMachine,
    /// Handle geometry when the current resize began.
    initial_geometry: Option<ItemGeometry>,
}

impl ItemController {
    #[must_use]
    pub fn new(definition: ItemDefinition) -> Self {
        Self {
            definition,
            machine: ResizeMachine::new(),
            initial_geometry: None,
        }
    }

    #[must_use]
    pub const fn definition(&self) -> &ItemDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.definition.id
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.definition.span
    }

    /// Accept the host's latest definition for this item.
    pub fn set_definition(&mut self, definition: ItemDefinition) {
        self.definition = definition;
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.machine.is_active()
    }

    /// Whether the drag tracker should accept this item.
    #[must_use]
    pub const fn is_draggable(&self) -> bool {
        !self.definition.disabled && !self.is_resizing()
    }

    #[must_use]
    pub fn geometry(&self, bag: &TimelineBag) -> ItemGeometry {
        ItemGeometry::of_span(&self.definition.span, bag.mapper())
    }

    #[must_use]
    pub fn style(&self, bag: &TimelineBag) -> ItemStyle {
        ItemStyle::of_span(&self.definition.span, bag.mapper())
    }

    #[must_use]
    pub fn content_style(&self, bag: &TimelineBag) -> ItemContentStyle {
        ItemContentStyle::of_span(&self.definition.span, bag.mapper())
    }

    /// Payload for the drag tracker.
    #[must_use]
    pub fn drag_data(&self) -> DragItemData {
        DragItemData {
            span: Some(self.definition.span),
            duration: None,
            data: self.definition.data.clone(),
        }
    }

    /// Cursor for a pointer hovering at `pointer_x`.
    #[must_use]
    pub fn hover_cursor(
        &self,
        bag: &TimelineBag,
        handle: &impl RenderHandle,
        pointer_x: f64,
    ) -> HoverCursor {
        if self.definition.disabled {
            return HoverCursor::Default;
        }
        if let Some(direction) = self.machine.direction() {
            return HoverCursor::for_direction(direction);
        }
        self.edge_under(bag, handle, pointer_x)
            .map_or(HoverCursor::Grab, HoverCursor::for_direction)
    }

    pub fn pointer_down(
        &mut self,
        bag: &TimelineBag,
        handle: &mut impl RenderHandle,
        input: &PointerInput,
    ) -> ItemPointerDispatch {
        if self.definition.disabled {
            return ItemPointerDispatch::ignored(ItemIgnoredReason::Disabled);
        }
        if input.button != PointerButton::Primary {
            return ItemPointerDispatch::outcome(ItemPointerOutcome::ForwardToDrag);
        }
        let Some(direction) = self.edge_under(bag, &*handle, input.client_x) else {
            return ItemPointerDispatch::outcome(ItemPointerOutcome::ForwardToDrag);
        };

        let transition = match self.machine.apply(ResizeInput::Begin {
            direction,
            text_direction: bag.direction(),
            pointer_id: input.pointer_id,
            x: input.client_x,
        }) {
            Ok(transition) => transition,
            Err(err) => return self.rejected(err),
        };
        let outcome = match transition.effect {
            ResizeEffect::Started { .. } => {
                self.initial_geometry = Some(handle.geometry());
                tracing::debug!(
                    target: "spanline.item",
                    item = %self.definition.id,
                    direction = ?direction,
                    "resize started"
                );
                bag.emit_resize_start(&ResizeStartEvent {
                    active: self.active(),
                    direction,
                });
                ItemPointerOutcome::ResizeStarted { direction }
            }
            ResizeEffect::Noop { reason } => {
                ItemPointerOutcome::Ignored(ItemIgnoredReason::Machine(reason))
            }
            effect => self.unexpected(effect),
        };
        ItemPointerDispatch {
            transition: Some(transition),
            outcome,
        }
    }

    pub fn pointer_move(
        &mut self,
        bag: &TimelineBag,
        handle: &mut impl RenderHandle,
        input: &PointerInput,
    ) -> ItemPointerDispatch {
        let transition = match self.machine.apply(ResizeInput::Move {
            pointer_id: input.pointer_id,
            x: input.client_x,
        }) {
            Ok(transition) => transition,
            Err(err) => return self.rejected(err),
        };
        let outcome = match transition.effect {
            ResizeEffect::Updated {
                direction,
                total_delta_x,
                ..
            } => {
                let preview =
                    bag.span_from_delta(&self.definition.span, direction, total_delta_x);
                if let Some(span) = preview {
                    handle.set_geometry(ItemGeometry::of_span(&span, bag.mapper()));
                }
                bag.emit_resize_move(&ResizeMoveEvent {
                    active: self.active(),
                    delta: ResizeDelta { x: total_delta_x },
                    direction,
                    preview,
                });
                ItemPointerOutcome::ResizeUpdated { preview }
            }
            ResizeEffect::Noop { reason } => {
                ItemPointerOutcome::Ignored(ItemIgnoredReason::Machine(reason))
            }
            effect => self.unexpected(effect),
        };
        ItemPointerDispatch {
            transition: Some(transition),
            outcome,
        }
    }

    /// Finish the resize. The edge delta is read back from the handle, so it
    /// reflects the last preview that was actually shown. The handle then
    /// returns to the current span; the host decides whether to commit.
    pub fn pointer_up(
        &mut self,
        bag: &TimelineBag,
        handle: &mut impl RenderHandle,
        input: &PointerInput,
    ) -> ItemPointerDispatch {
        let transition = match self.machine.apply(ResizeInput::End {
            pointer_id: input.pointer_id,
            x: input.client_x,
        }) {
            Ok(transition) => transition,
            Err(err) => return self.rejected(err),
        };
        let outcome = match (transition.effect, self.initial_geometry.take()) {
            (ResizeEffect::Committed { direction, .. }, Some(initial)) => {
                let shown = handle.geometry();
                let delta_x = match direction {
                    ResizeDirection::Start => shown.offset - initial.offset,
                    ResizeDirection::End => shown.end_offset() - initial.end_offset(),
                };
                let event = ResizeEndEvent {
                    active: self.active(),
                    delta: ResizeDelta { x: delta_x },
                    direction,
                };
                let span = bag.span_from_resize_event(&event);
                handle.set_geometry(self.geometry(bag));
                tracing::debug!(
                    target: "spanline.item",
                    item = %self.definition.id,
                    direction = ?direction,
                    delta_x,
                    committed = span.is_some(),
                    "resize ended"
                );
                bag.emit_resize_end(&event);
                ItemPointerOutcome::ResizeCommitted { event, span }
            }
            (ResizeEffect::Noop { reason }, initial) => {
                self.initial_geometry = initial;
                ItemPointerOutcome::Ignored(ItemIgnoredReason::Machine(reason))
            }
            (effect, initial) => {
                self.initial_geometry = initial;
                self.unexpected(effect)
            }
        };
        ItemPointerDispatch {
            transition: Some(transition),
            outcome,
        }
    }

    /// Abandon an in-flight resize and restore the handle. No event is
    /// emitted.
    pub fn cancel(
        &mut self,
        bag: &TimelineBag,
        handle: &mut impl RenderHandle,
        reason: CancelReason,
    ) -> ItemPointerDispatch {
        let transition = match self.machine.apply(ResizeInput::Cancel { reason }) {
            Ok(transition) => transition,
            Err(err) => return self.rejected(err),
        };
        let outcome = match transition.effect {
            ResizeEffect::Canceled { .. } => {
                self.initial_geometry = None;
                handle.set_geometry(self.geometry(bag));
                tracing::debug!(
                    target: "spanline.item",
                    item = %self.definition.id,
                    reason = ?reason,
                    "resize canceled"
                );
                ItemPointerOutcome::ResizeCanceled { reason }
            }
            ResizeEffect::Noop { reason } => {
                ItemPointerOutcome::Ignored(ItemIgnoredReason::Machine(reason))
            }
            effect => self.unexpected(effect),
        };
        ItemPointerDispatch {
            transition: Some(transition),
            outcome,
        }
    }

    fn edge_under(
        &self,
        bag: &TimelineBag,
        handle: &impl RenderHandle,
        pointer_x: f64,
    ) -> Option<ResizeDirection> {
        let (start_x, end_x) = handle.geometry().screen_edges(bag.mapper());
        classify_resize_edge(pointer_x, start_x, end_x, bag.resize_handle_width())
    }

    fn active(&self) -> ResizeActive {
        ResizeActive {
            id: self.definition.id.clone(),
            span: self.definition.span,
            data: self.definition.data.clone(),
        }
    }

    fn unexpected(&self, effect: ResizeEffect) -> ItemPointerOutcome {
        tracing::warn!(
            target: "spanline.item",
            item = %self.definition.id,
            effect = ?effect,
            "resize machine produced an unexpected effect"
        );
        ItemPointerOutcome::Ignored(ItemIgnoredReason::UnexpectedEffect(effect))
    }

    fn rejected(&self, err: ResizeMachineError) -> ItemPointerDispatch {
        tracing::warn!(
            target: "spanline.item",
            item = %self.definition.id,
            error = %err,
            "pointer input rejected"
        );
        ItemPointerDispatch::ignored(ItemIgnoredReason::InvalidInput(err))
    }
}

/// Drag payload for an item dragged in from outside the timeline.
#[must_use]
pub fn external_drag_data(duration: f64, data: DataBag) -> DragItemData {
    DragItemData {
        span: None,
        duration: Some(duration),
        data,
    }
}
