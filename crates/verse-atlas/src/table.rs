//! Visibility flags written by the declutter pass and read by the renderer.

use rustc_hash::FxHashMap;

use crate::label::LabelId;

/// Per-label visibility, keyed by [`LabelId`].
///
/// Labels missing from the table were not part of the last pass and count as
/// hidden.
#[derive(Clone, Debug, Default)]
pub struct LabelStateTable {
    visible: FxHashMap<LabelId, bool>,
}

impl LabelStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, id: LabelId) -> bool {
        self.visible.get(&id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: LabelId, visible: bool) {
        self.visible.insert(id, visible);
    }

    /// Drop every entry. Called at the start of each pass.
    pub fn clear(&mut self) {
        self.visible.clear();
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.values().filter(|v| **v).count()
    }

    /// Ids currently flagged visible, in no particular order.
    pub fn visible_ids(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.visible
            .iter()
            .filter_map(|(id, visible)| visible.then_some(*id))
    }
}
