//! Persistent idle markers shown above crate anchors.
//!
//! A marker is hidden while a reveal is running at its anchor and shown
//! again when the session stops.

use hashbrown::HashMap;
use loot_spatial::BlockPos;
use parking_lot::Mutex;

/// Visibility registry for per-anchor idle markers.
#[derive(Default)]
pub struct IdleMarkers {
    visible: Mutex<HashMap<BlockPos, bool>>,
}

impl IdleMarkers {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide the marker at an anchor.
    pub fn hide(&self, anchor: BlockPos) {
        self.visible.lock().insert(anchor, false);
    }

    /// Show the marker at an anchor.
    pub fn show(&self, anchor: BlockPos) {
        self.visible.lock().insert(anchor, true);
    }

    /// Whether the marker at an anchor is visible. Anchors never touched
    /// count as visible.
    #[must_use]
    pub fn is_visible(&self, anchor: BlockPos) -> bool {
        self.visible.lock().get(&anchor).copied().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_show_cycle() {
        let markers = IdleMarkers::new();
        let anchor = BlockPos::new(10, 64, -3);

        assert!(markers.is_visible(anchor));
        markers.hide(anchor);
        assert!(!markers.is_visible(anchor));
        markers.show(anchor);
        assert!(markers.is_visible(anchor));
    }
}
