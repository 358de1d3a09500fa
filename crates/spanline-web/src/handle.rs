#![forbid(unsafe_code)]

//! Imperative render handles.
//!
//! During a resize the controller writes preview geometry straight to the
//! item's rendered node, bypassing the host's item state, and reads it back
//! when the pointer is released. A DOM bridge implements [`RenderHandle`]
//! over the element's inline style; [`RetainedHandle`] keeps the geometry in
//! memory for headless hosts and tests.

use spanline_layout::ItemGeometry;

/// Read/write access to an item's rendered geometry.
pub trait RenderHandle {
    fn geometry(&self) -> ItemGeometry;
    fn set_geometry(&mut self, geometry: ItemGeometry);
}

/// In-memory render handle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RetainedHandle {
    geometry: ItemGeometry,
    writes: u64,
}

impl RetainedHandle {
    #[must_use]
    pub const fn new(geometry: ItemGeometry) -> Self {
        Self {
            geometry,
            writes: 0,
        }
    }

    /// Number of `set_geometry` calls since construction.
    #[must_use]
    pub const fn writes(&self) -> u64 {
        self.writes
    }
}

impl RenderHandle for RetainedHandle {
    fn geometry(&self) -> ItemGeometry {
        self.geometry
    }

    fn set_geometry(&mut self, geometry: ItemGeometry) {
        self.geometry = geometry;
        self.writes = self.writes.saturating_add(1);
    }
}

impl<H: RenderHandle + ?Sized> RenderHandle for &mut H {
    fn geometry(&self) -> ItemGeometry {
        (**self).geometry()
    }

    fn set_geometry(&mut self, geometry: ItemGeometry) {
        (**self).set_geometry(geometry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(handle: &mut impl RenderHandle) {
        let current = handle.geometry();
        handle.set_geometry(ItemGeometry::new(current.offset + 1.0, current.width));
    }

    #[test]
    fn retained_handle_counts_writes() {
        let mut handle = RetainedHandle::new(ItemGeometry::new(10.0, 5.0));
        bump(&mut handle);
        bump(&mut &mut handle);
        assert_eq!(handle.geometry(), ItemGeometry::new(12.0, 5.0));
        assert_eq!(handle.writes(), 2);
    }
}
