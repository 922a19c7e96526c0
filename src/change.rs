//! What a mutation touched, so the host can decide what to redraw.

use serde::Serialize;

use crate::panel::PanelId;

/// Summary of one core mutation.
///
/// Every mutating method returns one of these instead of reaching into a
/// UI tree. An empty change means the call was a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Change {
    /// The panel the mutation was about, if any.
    pub panel: Option<PanelId>,
    /// The selected panel changed (including becoming empty).
    pub selection: bool,
    /// A panel was added or removed.
    pub registry: bool,
    /// Position or size of `panel` changed.
    pub geometry: bool,
    pub title: bool,
    /// A series color of `panel` changed.
    pub colors: bool,
    /// Paint order changed.
    pub z_order: bool,
}

impl Change {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_panel(id: PanelId) -> Self {
        Self {
            panel: Some(id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.selection || self.registry || self.geometry || self.title || self.colors || self.z_order)
    }

    /// Whether the format panel must be rebuilt from the registry.
    pub fn needs_format_render(&self) -> bool {
        self.selection || self.registry
    }

    /// Combine two changes; the later panel id wins when both name one.
    pub fn merge(self, other: Change) -> Change {
        Change {
            panel: other.panel.or(self.panel),
            selection: self.selection || other.selection,
            registry: self.registry || other.registry,
            geometry: self.geometry || other.geometry,
            title: self.title || other.title,
            colors: self.colors || other.colors,
            z_order: self.z_order || other.z_order,
        }
    }
}
