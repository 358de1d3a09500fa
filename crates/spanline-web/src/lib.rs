#![forbid(unsafe_code)]

//! Host-facing adapters.
//!
//! Hosts (a DOM bridge, a test harness, a native shell) translate their raw
//! input into the types in `spanline-core` and feed them through these
//! adapters. Each adapter answers with plain data: semantic events, and
//! explicit commands the host must carry out (attach a wheel listener,
//! observe an element's width, capture a pointer).

pub mod drag;
pub mod handle;
pub mod observer;
pub mod pan;

pub use drag::{
    ActiveDrag, DEFAULT_DRAG_THRESHOLD, DragDelta, DragDispatch, DragEvent, DragIgnoredReason,
    DragItemData, DragOutcome, DragSnapshot, DragTracker, PointerCaptureCommand,
};
pub use handle::{RenderHandle, RetainedHandle};
pub use observer::{ElementWidthObserver, ObserverCommand};
pub use pan::{
    ListenerCommand, PanDecision, PanEndEvent, PanListener, PanModifiers, PanStrategy,
    configured_pan_strategy, default_pan_strategy, wheel_pan_strategy,
};
