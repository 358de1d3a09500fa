#![forbid(unsafe_code)]

//! Timeline session: host range, viewport measurement, and the derived
//! [`TimelineBag`].
//!
//! A [`Timeline`] is created once per rendered timeline. The host feeds it
//! the visible range on every render, the viewport element identity and its
//! measurements, row mounts and sidebar widths, and wheel input. In return
//! it maintains an immutable [`TimelineBag`] that item and row controllers
//! borrow to compute geometry and interpret pointer movement.
//!
//! # Invariants
//!
//! 1. The bag is replaced, never mutated; it exists only while the viewport
//!    has been measured.
//! 2. The bag is rebuilt only when one of its inputs changed, so holding an
//!    equal bag across renders is cheap.
//! 3. A pan/zoom update that would collapse the range is never reported.
//!
//! # Failure Modes
//!
//! - Conversions requested before the viewport is measured return `None`.
//! - Drops with no target row, onto a disabled row, or onto a row the
//!   timeline never mounted resolve to `None`.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use spanline_core::{
    CoordinateMapper, Direction, ElementId, GridSizeDefinition, Range, RowDefinition, RowId, Span,
    TimelineRect, WheelInput,
};
use spanline_layout::ResizeDirection;
use spanline_web::{
    DragSnapshot, DragTracker, ElementWidthObserver, ListenerCommand, ObserverCommand,
    PanDecision, PanEndEvent, PanListener, PanStrategy, configured_pan_strategy,
    default_pan_strategy,
};

use crate::config::TimelineConfig;
use crate::error::{TimelineError, ensure_non_negative};
use crate::event::{RangeUpdate, ResizeEndEvent, ResizeMoveEvent, ResizeStartEvent};

pub type RangeChangedHandler = Box<dyn Fn(&RangeUpdate)>;
pub type ResizeStartHandler = Box<dyn Fn(&ResizeStartEvent)>;
pub type ResizeMoveHandler = Box<dyn Fn(&ResizeMoveEvent)>;
pub type ResizeEndHandler = Box<dyn Fn(&ResizeEndEvent)>;

/// Computes a resized span from the grabbed edge's logical pixel delta.
pub type SpanFromDelta = Box<dyn Fn(&SpanDeltaInput<'_>) -> Option<Span>>;

/// Arguments handed to a [`SpanFromDelta`] function.
#[derive(Debug, Clone, Copy)]
pub struct SpanDeltaInput<'a> {
    /// Span before the gesture.
    pub span: &'a Span,
    pub direction: ResizeDirection,
    /// Logical pixels; positive moves the edge towards the inline end.
    pub delta_x: f64,
    pub mapper: &'a CoordinateMapper,
}

/// Move the grabbed edge by `delta_x`, snapping the moved edge to the grid.
///
/// Returns `None` when the edge would cross the opposite one.
#[must_use]
pub fn default_span_from_delta(input: &SpanDeltaInput<'_>) -> Option<Span> {
    let delta = input.mapper.pixels_to_value(input.delta_x);
    let (start, end) = match input.direction {
        ResizeDirection::Start => (
            input.mapper.snap(input.span.start() + delta),
            input.span.end(),
        ),
        ResizeDirection::End => (
            input.span.start(),
            input.mapper.snap(input.span.end() + delta),
        ),
    };
    Span::new(start, end).ok()
}

/// Construction options for a [`Timeline`].
pub struct TimelineOptions {
    pub range: Range,
    pub on_range_changed: RangeChangedHandler,
    pub on_resize_end: ResizeEndHandler,
    pub on_resize_start: Option<ResizeStartHandler>,
    pub on_resize_move: Option<ResizeMoveHandler>,
    /// Fixed sidebar width; disables sizing the sidebar from its rows.
    pub sidebar_width: Option<f64>,
    pub grid_size: GridSizeDefinition,
    pub pan_strategy: Option<PanStrategy>,
    pub span_from_delta: Option<SpanFromDelta>,
    pub resize_handle_width: f64,
    pub drag_threshold: f64,
}

impl fmt::Debug for TimelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineOptions")
            .field("range", &self.range)
            .field("sidebar_width", &self.sidebar_width)
            .field("grid_size", &self.grid_size)
            .field("resize_handle_width", &self.resize_handle_width)
            .field("drag_threshold", &self.drag_threshold)
            .finish_non_exhaustive()
    }
}

impl TimelineOptions {
    /// Options with the required callbacks and default settings.
    pub fn new(
        range: Range,
        on_range_changed: impl Fn(&RangeUpdate) + 'static,
        on_resize_end: impl Fn(&ResizeEndEvent) + 'static,
    ) -> Self {
        let defaults = TimelineConfig::default();
        Self {
            range,
            on_range_changed: Box::new(on_range_changed),
            on_resize_end: Box::new(on_resize_end),
            on_resize_start: None,
            on_resize_move: None,
            sidebar_width: defaults.sidebar_width,
            grid_size: defaults.grid,
            pan_strategy: None,
            span_from_delta: None,
            resize_handle_width: defaults.resize_handle_width,
            drag_threshold: defaults.drag_threshold,
        }
    }

    /// Apply every setting from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &TimelineConfig) -> Self {
        self.resize_handle_width = config.resize_handle_width;
        self.grid_size = config.grid.clone();
        self.sidebar_width = config.sidebar_width;
        self.pan_strategy = Some(configured_pan_strategy(config.pan));
        self.drag_threshold = config.drag_threshold;
        self
    }

    #[must_use]
    pub fn with_on_resize_start(mut self, handler: impl Fn(&ResizeStartEvent) + 'static) -> Self {
        self.on_resize_start = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_on_resize_move(mut self, handler: impl Fn(&ResizeMoveEvent) + 'static) -> Self {
        self.on_resize_move = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_sidebar_width(mut self, width: f64) -> Self {
        self.sidebar_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_grid_size(mut self, grid_size: GridSizeDefinition) -> Self {
        self.grid_size = grid_size;
        self
    }

    #[must_use]
    pub fn with_pan_strategy(
        mut self,
        strategy: impl Fn(&WheelInput) -> PanDecision + 'static,
    ) -> Self {
        self.pan_strategy = Some(Box::new(strategy));
        self
    }

    #[must_use]
    pub fn with_span_from_delta(
        mut self,
        span_from_delta: impl Fn(&SpanDeltaInput<'_>) -> Option<Span> + 'static,
    ) -> Self {
        self.span_from_delta = Some(Box::new(span_from_delta));
        self
    }

    #[must_use]
    pub fn with_resize_handle_width(mut self, width: f64) -> Self {
        self.resize_handle_width = width;
        self
    }

    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }
}

struct ResizeHooks {
    on_resize_start: Option<ResizeStartHandler>,
    on_resize_move: Option<ResizeMoveHandler>,
    on_resize_end: ResizeEndHandler,
    span_from_delta: Option<SpanFromDelta>,
}

/// Immutable snapshot of the timeline's geometry and its conversion
/// functions.
#[derive(Clone)]
pub struct TimelineBag {
    mapper: CoordinateMapper,
    controlled_sidebar_width: Option<f64>,
    resize_handle_width: f64,
    hooks: Rc<ResizeHooks>,
}

impl fmt::Debug for TimelineBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineBag")
            .field("mapper", &self.mapper)
            .field("controlled_sidebar_width", &self.controlled_sidebar_width)
            .field("resize_handle_width", &self.resize_handle_width)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TimelineBag {
    fn eq(&self, other: &Self) -> bool {
        self.mapper == other.mapper
            && self.controlled_sidebar_width == other.controlled_sidebar_width
            && self.resize_handle_width == other.resize_handle_width
            && Rc::ptr_eq(&self.hooks, &other.hooks)
    }
}

impl TimelineBag {
    #[must_use]
    pub const fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        self.mapper.range()
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.mapper.direction()
    }

    /// Settled sidebar width.
    #[must_use]
    pub const fn sidebar_width(&self) -> f64 {
        self.mapper.sidebar_width()
    }

    /// Sidebar width the host pinned, if any.
    #[must_use]
    pub const fn controlled_sidebar_width(&self) -> Option<f64> {
        self.controlled_sidebar_width
    }

    /// Grid size resolved for the current range.
    #[must_use]
    pub const fn grid_size(&self) -> Option<f64> {
        self.mapper.grid_size()
    }

    #[must_use]
    pub const fn resize_handle_width(&self) -> f64 {
        self.resize_handle_width
    }

    #[must_use]
    pub fn value_to_pixels(&self, value: f64) -> f64 {
        self.mapper.value_to_pixels(value)
    }

    #[must_use]
    pub fn value_to_pixels_in(&self, value: f64, range: &Range) -> f64 {
        self.mapper.value_to_pixels_in(value, range)
    }

    #[must_use]
    pub fn pixels_to_value(&self, pixels: f64) -> f64 {
        self.mapper.pixels_to_value(pixels)
    }

    #[must_use]
    pub fn pixels_to_value_in(&self, pixels: f64, range: &Range) -> f64 {
        self.mapper.pixels_to_value_in(pixels, range)
    }

    #[must_use]
    pub fn delta_x_from_screen_x(&self, screen_x: f64) -> f64 {
        self.mapper.delta_x_from_screen_x(screen_x)
    }

    #[must_use]
    pub fn value_from_screen_x(&self, screen_x: f64) -> f64 {
        self.mapper.value_from_screen_x(screen_x)
    }

    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        self.mapper.snap(value)
    }

    /// Resize `span` by the grabbed edge's logical pixel delta, using the
    /// configured [`SpanFromDelta`] function.
    #[must_use]
    pub fn span_from_delta(
        &self,
        span: &Span,
        direction: ResizeDirection,
        delta_x: f64,
    ) -> Option<Span> {
        let input = SpanDeltaInput {
            span,
            direction,
            delta_x,
            mapper: &self.mapper,
        };
        match &self.hooks.span_from_delta {
            Some(custom) => custom(&input),
            None => default_span_from_delta(&input),
        }
    }

    /// Span an item should be committed with after a resize ends.
    #[must_use]
    pub fn span_from_resize_event(&self, event: &ResizeEndEvent) -> Option<Span> {
        self.span_from_delta(&event.active.span, event.direction, event.delta.x)
    }

    pub(crate) fn emit_resize_start(&self, event: &ResizeStartEvent) {
        if let Some(handler) = &self.hooks.on_resize_start {
            handler(event);
        }
    }

    pub(crate) fn emit_resize_move(&self, event: &ResizeMoveEvent) {
        if let Some(handler) = &self.hooks.on_resize_move {
            handler(event);
        }
    }

    pub(crate) fn emit_resize_end(&self, event: &ResizeEndEvent) {
        (self.hooks.on_resize_end)(event);
    }
}

/// Command the host must carry out for the viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Listener(ListenerCommand),
    Observer(ObserverCommand),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MountedRow {
    disabled: bool,
    sidebar_width: Option<f64>,
}

/// One timeline session.
pub struct Timeline {
    range: Range,
    direction: Direction,
    grid: GridSizeDefinition,
    controlled_sidebar_width: Option<f64>,
    resize_handle_width: f64,
    drag_threshold: f64,
    rows: FxHashMap<RowId, MountedRow>,
    observer: ElementWidthObserver,
    pan: PanListener,
    on_range_changed: RangeChangedHandler,
    hooks: Rc<ResizeHooks>,
    bag: Option<TimelineBag>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("range", &self.range)
            .field("direction", &self.direction)
            .field("rows", &self.rows.len())
            .field("viewport", &self.observer.element())
            .field("bag", &self.bag)
            .finish_non_exhaustive()
    }
}

impl Timeline {
    pub fn new(options: TimelineOptions) -> Result<Self, TimelineError> {
        options.grid_size.validate()?;
        let resize_handle_width =
            ensure_non_negative("resize_handle_width", options.resize_handle_width)?;
        let drag_threshold = ensure_non_negative("drag_threshold", options.drag_threshold)?;
        let controlled_sidebar_width = options
            .sidebar_width
            .map(|width| ensure_non_negative("sidebar_width", width))
            .transpose()?;

        Ok(Self {
            range: options.range,
            direction: Direction::Ltr,
            grid: options.grid_size,
            controlled_sidebar_width,
            resize_handle_width,
            drag_threshold,
            rows: FxHashMap::default(),
            observer: ElementWidthObserver::new(),
            pan: PanListener::new(options.pan_strategy.unwrap_or_else(default_pan_strategy)),
            on_range_changed: options.on_range_changed,
            hooks: Rc::new(ResizeHooks {
                on_resize_start: options.on_resize_start,
                on_resize_move: options.on_resize_move,
                on_resize_end: options.on_resize_end,
                span_from_delta: options.span_from_delta,
            }),
            bag: None,
        })
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    /// Direction read when the viewport was attached.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn viewport(&self) -> Option<ElementId> {
        self.observer.element()
    }

    /// Current geometry snapshot; `None` until the viewport is measured.
    #[must_use]
    pub const fn bag(&self) -> Option<&TimelineBag> {
        self.bag.as_ref()
    }

    /// Drag tracker configured with this timeline's threshold.
    #[must_use]
    pub fn drag_tracker(&self) -> DragTracker {
        DragTracker::new(self.drag_threshold)
    }

    /// Controlled sidebar width, else the widest width any mounted row
    /// reported.
    #[must_use]
    pub fn sidebar_width(&self) -> f64 {
        self.controlled_sidebar_width.unwrap_or_else(|| {
            self.rows
                .values()
                .filter_map(|row| row.sidebar_width)
                .fold(0.0, f64::max)
        })
    }

    /// Accept the host's range for this render.
    pub fn set_range(&mut self, range: Range) {
        if self.range != range {
            self.range = range;
            self.rebuild();
        }
    }

    pub fn set_grid_size(&mut self, grid: GridSizeDefinition) -> Result<(), TimelineError> {
        grid.validate()?;
        self.grid = grid;
        self.rebuild();
        Ok(())
    }

    /// Pin (`Some`) or release (`None`) the sidebar width.
    pub fn set_controlled_sidebar_width(
        &mut self,
        width: Option<f64>,
    ) -> Result<(), TimelineError> {
        self.controlled_sidebar_width = width
            .map(|width| ensure_non_negative("sidebar_width", width))
            .transpose()?;
        self.rebuild();
        Ok(())
    }

    /// Bind the timeline to its viewport element.
    ///
    /// `direction` is the element's computed inline direction; it is read
    /// once here and kept until the next attach.
    pub fn attach_viewport(
        &mut self,
        element: ElementId,
        direction: Direction,
    ) -> Vec<HostCommand> {
        self.direction = direction;
        let mut commands: Vec<HostCommand> = self
            .pan
            .attach(element)
            .into_iter()
            .map(HostCommand::Listener)
            .collect();
        commands.extend(
            self.observer
                .observe(element)
                .into_iter()
                .map(HostCommand::Observer),
        );
        tracing::debug!(
            target: "spanline.timeline",
            element = element.0,
            direction = ?direction,
            "viewport attached"
        );
        self.rebuild();
        commands
    }

    pub fn detach_viewport(&mut self) -> Vec<HostCommand> {
        let commands = self
            .pan
            .detach()
            .map(HostCommand::Listener)
            .into_iter()
            .chain(self.observer.unobserve().map(HostCommand::Observer))
            .collect();
        self.rebuild();
        commands
    }

    /// Record a measurement of the viewport element.
    ///
    /// Returns `true` when it changed the timeline's geometry.
    pub fn viewport_resized(&mut self, element: ElementId, rect: TimelineRect) -> bool {
        if !self.observer.record(element, rect) {
            return false;
        }
        self.rebuild();
        true
    }

    /// Register a row as a drop target.
    pub fn mount_row(&mut self, row: &RowDefinition) {
        let entry = self.rows.entry(row.id.clone()).or_insert(MountedRow {
            disabled: row.disabled,
            sidebar_width: None,
        });
        entry.disabled = row.disabled;
    }

    /// Forget a row and its sidebar width.
    pub fn unmount_row(&mut self, id: &RowId) {
        if self.rows.remove(id).is_some() {
            self.rebuild();
        }
    }

    /// Record the natural sidebar width of a mounted row.
    ///
    /// Returns `false` for unknown rows or invalid widths.
    pub fn report_sidebar_width(&mut self, id: &RowId, width: f64) -> bool {
        if !(width.is_finite() && width >= 0.0) {
            tracing::warn!(
                target: "spanline.timeline",
                row = %id,
                width,
                "invalid sidebar width ignored"
            );
            return false;
        }
        let Some(row) = self.rows.get_mut(id) else {
            return false;
        };
        row.sidebar_width = Some(width);
        self.rebuild();
        true
    }

    /// Whether a drop onto `id` can be accepted.
    #[must_use]
    pub fn is_row_droppable(&self, id: &RowId) -> bool {
        self.rows.get(id).is_some_and(|row| !row.disabled)
    }

    #[must_use]
    pub fn value_to_pixels(&self, value: f64) -> Option<f64> {
        self.bag.as_ref().map(|bag| bag.value_to_pixels(value))
    }

    #[must_use]
    pub fn pixels_to_value(&self, pixels: f64) -> Option<f64> {
        self.bag.as_ref().map(|bag| bag.pixels_to_value(pixels))
    }

    /// Run the pan strategy on a wheel sample from the viewport.
    ///
    /// A claimed sample that carries a pan is applied through
    /// [`Self::pan_end`]. The returned decision tells the host whether to
    /// suppress native scrolling.
    pub fn handle_wheel(&self, input: &WheelInput) -> PanDecision {
        let Some(decision) = self.pan.handle_wheel(input) else {
            return PanDecision::pass_through();
        };
        if let Some(pan) = &decision.pan {
            self.pan_end(pan);
        }
        decision
    }

    /// Turn a completed pan gesture into a range update and report it through
    /// `on_range_changed`.
    pub fn pan_end(&self, event: &PanEndEvent) -> Option<RangeUpdate> {
        let Some(bag) = &self.bag else {
            tracing::debug!(target: "spanline.timeline", "pan before viewport measured");
            return None;
        };
        let range = bag.range();
        let delta_x = bag.pixels_to_value(event.delta_x);
        let delta_y = bag.pixels_to_value(event.delta_y);
        let (start_bias, end_bias) = event
            .client_x
            .map_or((1.0, 1.0), |x| zoom_bias(&range, bag.value_from_screen_x(x)));

        let update = RangeUpdate {
            start_delta: delta_y * start_bias + delta_x,
            end_delta: -delta_y * end_bias + delta_x,
        };
        if update.try_apply(&range).is_none() {
            tracing::warn!(
                target: "spanline.timeline",
                start_delta = update.start_delta,
                end_delta = update.end_delta,
                "range update would collapse the range; ignored"
            );
            return None;
        }
        tracing::debug!(
            target: "spanline.timeline",
            start_delta = update.start_delta,
            end_delta = update.end_delta,
            "range changed"
        );
        (self.on_range_changed)(&update);
        Some(update)
    }

    /// Span a dragged item should be committed with, or `None` if the drop
    /// cannot be accepted.
    ///
    /// Items with a span are translated by the pointer delta; items that only
    /// carry a duration start where the pointer was released. The start is
    /// snapped to the grid and the item keeps its duration.
    #[must_use]
    pub fn span_from_drag_event(&self, snapshot: &DragSnapshot) -> Option<Span> {
        let Some(over) = &snapshot.over else {
            tracing::debug!(
                target: "spanline.timeline",
                item = %snapshot.active.id,
                "drop outside any row discarded"
            );
            return None;
        };
        if !self.is_row_droppable(over) {
            tracing::debug!(
                target: "spanline.timeline",
                item = %snapshot.active.id,
                row = %over,
                "drop on disabled or unmounted row discarded"
            );
            return None;
        }
        let bag = self.bag.as_ref()?;
        let data = &snapshot.active.data;

        let candidate = if let Some(span) = data.span {
            let delta = bag.pixels_to_value(snapshot.delta.x) * bag.direction().sign();
            Span::from_duration(bag.snap(span.start() + delta), span.duration())
        } else if let Some(duration) = data.duration {
            let start = bag.snap(bag.value_from_screen_x(snapshot.pointer_x()));
            Span::from_duration(start, duration)
        } else {
            tracing::debug!(
                target: "spanline.timeline",
                item = %snapshot.active.id,
                "drag data carries neither span nor duration"
            );
            return None;
        };

        match candidate {
            Ok(span) => Some(span),
            Err(err) => {
                tracing::debug!(
                    target: "spanline.timeline",
                    item = %snapshot.active.id,
                    error = %err,
                    "drop produced an invalid span"
                );
                None
            }
        }
    }

    /// Span a resized item should be committed with.
    #[must_use]
    pub fn span_from_resize_event(&self, event: &ResizeEndEvent) -> Option<Span> {
        self.bag.as_ref()?.span_from_resize_event(event)
    }

    fn rebuild(&mut self) {
        let Some(rect) = self.observer.rect() else {
            if self.bag.take().is_some() {
                tracing::debug!(target: "spanline.timeline", "bag dropped");
            }
            return;
        };
        let mapper = CoordinateMapper::new(
            self.range,
            rect,
            self.sidebar_width(),
            self.direction,
            self.grid.resolve(&self.range),
        );
        if self.bag.as_ref().is_some_and(|bag| {
            bag.mapper == mapper && bag.controlled_sidebar_width == self.controlled_sidebar_width
        }) {
            return;
        }
        tracing::debug!(
            target: "spanline.timeline",
            range_start = self.range.start(),
            range_end = self.range.end(),
            viewport_width = mapper.viewport_width(),
            sidebar_width = mapper.sidebar_width(),
            grid_size = ?mapper.grid_size(),
            "bag rebuilt"
        );
        self.bag = Some(TimelineBag {
            mapper,
            controlled_sidebar_width: self.controlled_sidebar_width,
            resize_handle_width: self.resize_handle_width,
            hooks: Rc::clone(&self.hooks),
        });
    }
}

/// Fractional position of `cursor` in `range`, as (start, end) weights.
///
/// Falls back to `(1, 1)` unless the cursor lies strictly inside the range.
fn zoom_bias(range: &Range, cursor: f64) -> (f64, f64) {
    if cursor > range.start() && cursor < range.end() {
        let duration = range.duration();
        (
            (cursor - range.start()) / duration,
            (range.end() - cursor) / duration,
        )
    } else {
        (1.0, 1.0)
    }
}
