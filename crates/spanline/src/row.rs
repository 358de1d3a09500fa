#![forbid(unsafe_code)]

//! Per-row controller: drop-target registration, styles, and sidebar width
//! reporting.

use serde::{Deserialize, Serialize};
use spanline_core::{DataBag, RowDefinition, RowId};
use spanline_layout::RowStyles;

use crate::timeline::{Timeline, TimelineBag};

/// Drop target description for a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droppable {
    pub row_id: RowId,
    pub disabled: bool,
    #[serde(default)]
    pub data: DataBag,
}

/// Controller for one rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowController {
    definition: RowDefinition,
}

impl RowController {
    #[must_use]
    pub const fn new(definition: RowDefinition) -> Self {
        Self { definition }
    }

    #[must_use]
    pub const fn id(&self) -> &RowId {
        &self.definition.id
    }

    #[must_use]
    pub const fn definition(&self) -> &RowDefinition {
        &self.definition
    }

    /// Register (or refresh) the row as a drop target.
    pub fn mount(&self, timeline: &mut Timeline) {
        timeline.mount_row(&self.definition);
    }

    /// Replace the definition and refresh the registration.
    pub fn update(&mut self, timeline: &mut Timeline, definition: RowDefinition) {
        if definition.id != self.definition.id {
            timeline.unmount_row(&self.definition.id);
        }
        self.definition = definition;
        timeline.mount_row(&self.definition);
    }

    pub fn unmount(&self, timeline: &mut Timeline) {
        timeline.unmount_row(&self.definition.id);
    }

    /// Report the sidebar's natural width, as measured by the host.
    pub fn report_sidebar_width(&self, timeline: &mut Timeline, width: f64) -> bool {
        timeline.report_sidebar_width(&self.definition.id, width)
    }

    #[must_use]
    pub fn droppable(&self) -> Droppable {
        Droppable {
            row_id: self.definition.id.clone(),
            disabled: self.definition.disabled,
            data: self.definition.data.clone(),
        }
    }

    #[must_use]
    pub fn styles(&self, bag: &TimelineBag) -> RowStyles {
        RowStyles::new(bag.mapper(), bag.controlled_sidebar_width())
    }
}
