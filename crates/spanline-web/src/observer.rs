#![forbid(unsafe_code)]

//! Viewport width observation keyed by element identity.
//!
//! The host owns the real observer (for example a `ResizeObserver`); this
//! type tells it what to observe and filters the measurements it reports
//! back, so a measurement for an element that is no longer the viewport is
//! ignored.

use serde::{Deserialize, Serialize};
use spanline_core::{ElementId, TimelineRect};

/// Observation lifecycle command for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ObserverCommand {
    Observe { element: ElementId },
    Unobserve { element: ElementId },
}

/// Tracks the bounding box of the observed viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementWidthObserver {
    element: Option<ElementId>,
    rect: Option<TimelineRect>,
}

impl ElementWidthObserver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            element: None,
            rect: None,
        }
    }

    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Last accepted measurement of the observed element.
    #[must_use]
    pub const fn rect(&self) -> Option<TimelineRect> {
        self.rect
    }

    /// Start observing `element`. Any previous element is unobserved and its
    /// measurement forgotten.
    pub fn observe(&mut self, element: ElementId) -> Vec<ObserverCommand> {
        match self.element {
            Some(current) if current == element => Vec::new(),
            Some(current) => {
                self.element = Some(element);
                self.rect = None;
                vec![
                    ObserverCommand::Unobserve { element: current },
                    ObserverCommand::Observe { element },
                ]
            }
            None => {
                self.element = Some(element);
                vec![ObserverCommand::Observe { element }]
            }
        }
    }

    pub fn unobserve(&mut self) -> Option<ObserverCommand> {
        self.rect = None;
        self.element
            .take()
            .map(|element| ObserverCommand::Unobserve { element })
    }

    /// Record a measurement. Returns `true` when it was accepted and differs
    /// from the previous one.
    pub fn record(&mut self, element: ElementId, rect: TimelineRect) -> bool {
        if self.element != Some(element) {
            tracing::debug!(
                target: "spanline.observer",
                element = element.0,
                observed = ?self.element,
                "measurement for unobserved element ignored"
            );
            return false;
        }
        if !(rect.left.is_finite() && rect.width.is_finite()) {
            tracing::warn!(
                target: "spanline.observer",
                element = element.0,
                left = rect.left,
                width = rect.width,
                "non-finite measurement ignored"
            );
            return false;
        }
        if self.rect == Some(rect) {
            return false;
        }
        self.rect = Some(rect);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_switches_elements() {
        let mut observer = ElementWidthObserver::new();
        assert_eq!(
            observer.observe(ElementId(1)),
            vec![ObserverCommand::Observe {
                element: ElementId(1)
            }]
        );
        assert!(observer.record(ElementId(1), TimelineRect::new(0.0, 800.0)));
        assert_eq!(
            observer.observe(ElementId(2)),
            vec![
                ObserverCommand::Unobserve {
                    element: ElementId(1)
                },
                ObserverCommand::Observe {
                    element: ElementId(2)
                },
            ]
        );
        assert_eq!(observer.rect(), None);
    }

    #[test]
    fn record_filters_stale_and_duplicate_measurements() {
        let mut observer = ElementWidthObserver::new();
        observer.observe(ElementId(1));
        assert!(!observer.record(ElementId(2), TimelineRect::new(0.0, 10.0)));
        assert!(observer.record(ElementId(1), TimelineRect::new(0.0, 10.0)));
        assert!(!observer.record(ElementId(1), TimelineRect::new(0.0, 10.0)));
        assert!(!observer.record(ElementId(1), TimelineRect::new(0.0, f64::NAN)));
        assert_eq!(observer.rect(), Some(TimelineRect::new(0.0, 10.0)));
    }

    #[test]
    fn unobserve_clears_state() {
        let mut observer = ElementWidthObserver::new();
        assert_eq!(observer.unobserve(), None);
        observer.observe(ElementId(3));
        observer.record(ElementId(3), TimelineRect::new(5.0, 50.0));
        assert_eq!(
            observer.unobserve(),
            Some(ObserverCommand::Unobserve {
                element: ElementId(3)
            })
        );
        assert_eq!(observer.rect(), None);
        assert!(!observer.record(ElementId(3), TimelineRect::new(5.0, 50.0)));
    }
}
