//! Single-panel selection state.

use crate::panel::PanelId;

/// Tracks which panel (if any) is selected.
///
/// At most one panel is selected at a time. The registry is responsible
/// for only ever storing live ids here and for clearing the selection in
/// the same call that deletes the selected panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<PanelId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<PanelId> {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn is_selected(&self, id: PanelId) -> bool {
        self.selected == Some(id)
    }

    /// Replace any prior selection with `id`. Returns the previous one.
    pub fn select(&mut self, id: PanelId) -> Option<PanelId> {
        self.selected.replace(id)
    }

    /// Clear the selection. Returns the previous one.
    pub fn clear(&mut self) -> Option<PanelId> {
        self.selected.take()
    }
}
