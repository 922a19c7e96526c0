//! The set of live panels, the selection and the z-order pool.
//!
//! [`PanelRegistry`] owns every [`Panel`]. Ids and z-indices come from
//! monotonic counters that are never reset, so paint order stays total
//! across the registry's whole lifetime, even after all panels are gone.

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::change::Change;
use crate::config::CanvasConfig;
use crate::geometry::{Rect, cascade_origin, clamp_box};
use crate::panel::{Panel, PanelId, VisualKind};
use crate::renderable::Renderable;
use crate::selection::Selection;

pub struct PanelRegistry {
    config: CanvasConfig,
    panels: IndexMap<PanelId, Panel>,
    selection: Selection,
    /// Number of panels ever created; doubles as the id source.
    created: u64,
    z_counter: i64,
}

impl PanelRegistry {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            panels: IndexMap::new(),
            selection: Selection::new(),
            created: 0,
            z_counter: config.z_base,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.panels.contains_key(&id)
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(&id)
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    /// Live panel ids ordered back to front.
    pub fn paint_order(&self) -> Vec<PanelId> {
        let mut ids: Vec<(i64, PanelId)> = self.panels.values().map(|p| (p.z_index(), p.id())).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn selected(&self) -> Option<PanelId> {
        self.selection.get()
    }

    pub fn selected_panel(&self) -> Option<&Panel> {
        self.selection.get().and_then(|id| self.panels.get(&id))
    }

    pub fn is_selected(&self, id: PanelId) -> bool {
        self.selection.is_selected(id)
    }

    /// Current value of the z pool (the last index handed out).
    pub fn z_counter(&self) -> i64 {
        self.z_counter
    }

    /// Number of panels ever created.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    fn next_z(&mut self) -> i64 {
        self.z_counter = self.z_counter.saturating_add(1);
        self.z_counter
    }

    // ────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ────────────────────────────────────────────────────────────────────────

    /// Create a panel at the next cascade position with the default size
    /// and the next z-index, and make it the sole selection.
    ///
    /// The returned change always names the new panel.
    pub fn create_panel(&mut self, kind: VisualKind, title: impl Into<String>) -> Change {
        let n = self.created;
        self.created += 1;
        let id = PanelId(self.created);

        let limits = self.config.limits();
        let size = self.config.default_size();
        let origin = cascade_origin(n, self.config.cascade_origin, self.config.cascade_step, size, &limits);
        let rect = clamp_box(Rect::new(origin.x, origin.y, size.0, size.1), &limits);
        let z = self.next_z();

        self.panels.insert(id, Panel::new(id, kind, title.into(), rect, z));
        debug!(panel = %id, %kind, x = rect.x, y = rect.y, z, "panel created");

        let selected = self.select(id);
        Change {
            registry: true,
            ..selected
        }
    }

    /// Remove a panel, releasing its renderable. No-op if `id` is absent.
    ///
    /// A release failure is logged and otherwise ignored. If the panel was
    /// selected the selection is cleared in the same call.
    pub fn delete_panel(&mut self, id: PanelId) -> Change {
        let Some(mut panel) = self.panels.shift_remove(&id) else {
            trace!(panel = %id, "delete of absent panel ignored");
            return Change::none();
        };
        if let Err(err) = panel.release() {
            warn!(panel = %id, error = %err, "renderable release failed; deleting anyway");
        }
        debug!(panel = %id, "panel deleted");

        let mut change = Change {
            registry: true,
            ..Change::for_panel(id)
        };
        if self.selection.is_selected(id) {
            change = change.merge(self.deselect_all());
        }
        change
    }

    /// Delete every panel. The id and z counters keep their values.
    pub fn clear(&mut self) -> Change {
        let ids: Vec<PanelId> = self.panels.keys().copied().collect();
        ids.into_iter()
            .fold(Change::none(), |acc, id| acc.merge(self.delete_panel(id)))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Selection and z-order
    // ────────────────────────────────────────────────────────────────────────

    /// Make `id` the only selected panel. No-op if `id` is absent.
    pub fn select(&mut self, id: PanelId) -> Change {
        if !self.panels.contains_key(&id) {
            return Change::none();
        }
        let previous = self.selection.select(id);
        if previous != Some(id) {
            trace!(panel = %id, previous = ?previous, "selected");
        }
        Change {
            selection: true,
            ..Change::for_panel(id)
        }
    }

    /// Clear the selection. Always reports a selection change so the
    /// format panel is re-rendered.
    pub fn deselect_all(&mut self) -> Change {
        let previous = self.selection.clear();
        if let Some(prev) = previous {
            trace!(panel = %prev, "deselected");
        }
        Change {
            panel: previous,
            selection: true,
            ..Change::none()
        }
    }

    /// Give `id` a fresh z-index above every other panel.
    pub fn bring_to_front(&mut self, id: PanelId) -> Change {
        if !self.panels.contains_key(&id) {
            return Change::none();
        }
        let z = self.next_z();
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.set_z_index(z);
        }
        trace!(panel = %id, z, "brought to front");
        Change {
            z_order: true,
            ..Change::for_panel(id)
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Panel content
    // ────────────────────────────────────────────────────────────────────────

    /// Clamp `rect` and write it to the panel. With `reflow`, the panel's
    /// renderable is notified afterwards.
    pub(crate) fn write_rect(&mut self, id: PanelId, rect: Rect, reflow: bool) -> Change {
        let limits = self.config.limits();
        let Some(panel) = self.panels.get_mut(&id) else {
            return Change::none();
        };
        let changed = panel.set_rect(clamp_box(rect, &limits));
        if reflow {
            panel.notify_resize();
        }
        Change {
            geometry: changed,
            ..Change::for_panel(id)
        }
    }

    /// Replace the panel title. No-op if `id` is absent.
    pub fn set_title(&mut self, id: PanelId, title: &str) -> Change {
        let Some(panel) = self.panels.get_mut(&id) else {
            return Change::none();
        };
        if panel.title == title {
            return Change::for_panel(id);
        }
        panel.title = title.to_string();
        Change {
            title: true,
            ..Change::for_panel(id)
        }
    }

    /// Call `set_color` on the series `key` of panel `id`.
    /// No-op if either is absent.
    pub fn set_series_color(&mut self, id: PanelId, key: &str, color: &str) -> Change {
        let Some(series) = self.panels.get(&id).and_then(|p| p.series_by_key(key)) else {
            return Change::none();
        };
        series.set_color(color);
        trace!(panel = %id, series = key, color, "series recolored");
        Change {
            colors: true,
            ..Change::for_panel(id)
        }
    }

    /// Hand a renderable to panel `id`. If `id` is absent the renderable is
    /// released immediately.
    pub fn attach_renderable(&mut self, id: PanelId, mut renderable: Box<dyn Renderable>) -> Change {
        let Some(panel) = self.panels.get_mut(&id) else {
            if let Err(err) = renderable.release() {
                warn!(panel = %id, error = %err, "release of orphaned renderable failed");
            }
            return Change::none();
        };
        if let Err(err) = panel.attach(renderable) {
            warn!(panel = %id, error = %err, "release of replaced renderable failed");
        }
        Change {
            registry: true,
            colors: true,
            ..Change::for_panel(id)
        }
    }
}

impl Drop for PanelRegistry {
    fn drop(&mut self) {
        for (id, panel) in self.panels.iter_mut() {
            if let Err(err) = panel.release() {
                warn!(panel = %id, error = %err, "renderable release failed during teardown");
            }
        }
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::renderable::Series;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe {
        resized: Rc<Cell<u32>>,
        released: Rc<Cell<bool>>,
        fail_release: bool,
    }

    impl Renderable for Probe {
        fn resize(&mut self, _w: i32, _h: i32) {
            self.resized.set(self.resized.get() + 1);
        }
        fn release(&mut self) -> Result<(), RenderError> {
            self.released.set(true);
            if self.fail_release {
                Err(RenderError::Release("engine exploded".into()))
            } else {
                Ok(())
            }
        }
        fn series(&self) -> Vec<Series> {
            Vec::new()
        }
    }

    fn probe(fail_release: bool) -> (Box<Probe>, Rc<Cell<u32>>, Rc<Cell<bool>>) {
        let resized = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(false));
        let p = Box::new(Probe {
            resized: resized.clone(),
            released: released.clone(),
            fail_release,
        });
        (p, resized, released)
    }

    fn create(reg: &mut PanelRegistry, kind: VisualKind) -> PanelId {
        reg.create_panel(kind, kind.default_title()).panel.unwrap()
    }

    #[test]
    fn test_create_cascades_and_selects() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        let b = create(&mut reg, VisualKind::Donut);
        assert_eq!(reg.get(a).unwrap().rect(), Rect::new(40, 40, 380, 260));
        assert_eq!(reg.get(b).unwrap().rect(), Rect::new(58, 54, 380, 260));
        assert_eq!(reg.selected(), Some(b));
        assert_eq!(reg.get(a).unwrap().z_index(), 11);
        assert_eq!(reg.get(b).unwrap().z_index(), 12);
    }

    #[test]
    fn test_cascade_counts_deleted_panels() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        reg.delete_panel(a);
        let b = create(&mut reg, VisualKind::Line);
        assert_eq!(reg.get(b).unwrap().rect().x, 58);
        assert_ne!(a, b);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Pie);
        let change = reg.delete_panel(a);
        assert!(change.registry && change.selection);
        assert_eq!(reg.selected(), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_delete_unselected_keeps_selection() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Pie);
        let b = create(&mut reg, VisualKind::Pie);
        let change = reg.delete_panel(a);
        assert!(!change.selection);
        assert_eq!(reg.selected(), Some(b));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut reg = PanelRegistry::default();
        assert!(reg.delete_panel(PanelId(42)).is_empty());
    }

    #[test]
    fn test_delete_swallows_release_failure() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        let (p, _, released) = probe(true);
        reg.attach_renderable(a, p);
        reg.delete_panel(a);
        assert!(released.get());
        assert!(!reg.contains(a));
    }

    #[test]
    fn test_select_absent_is_noop() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        assert!(reg.select(PanelId(99)).is_empty());
        assert_eq!(reg.selected(), Some(a));
    }

    #[test]
    fn test_bring_to_front_is_monotonic() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        let b = create(&mut reg, VisualKind::Line);
        assert_eq!(reg.paint_order(), vec![a, b]);
        reg.bring_to_front(a);
        assert_eq!(reg.paint_order(), vec![b, a]);
        assert_eq!(reg.get(a).unwrap().z_index(), 13);
        assert!(reg.bring_to_front(PanelId(77)).is_empty());
        assert_eq!(reg.z_counter(), 13);
    }

    #[test]
    fn test_z_counter_survives_clear() {
        let mut reg = PanelRegistry::default();
        create(&mut reg, VisualKind::Line);
        create(&mut reg, VisualKind::Line);
        reg.clear();
        assert!(reg.is_empty());
        let c = create(&mut reg, VisualKind::Line);
        assert_eq!(reg.get(c).unwrap().z_index(), 13);
    }

    #[test]
    fn test_z_counter_saturates_without_panic() {
        let mut reg = PanelRegistry::new(CanvasConfig {
            z_base: i64::MAX,
            ..CanvasConfig::default()
        });
        let a = create(&mut reg, VisualKind::Line);
        reg.bring_to_front(a);
        assert_eq!(reg.get(a).unwrap().z_index(), i64::MAX);
    }

    #[test]
    fn test_attach_notifies_resize() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        let (p, resized, _) = probe(false);
        reg.attach_renderable(a, p);
        assert_eq!(resized.get(), 1);
        reg.write_rect(a, Rect::new(0, 0, 500, 300), true);
        assert_eq!(resized.get(), 2);
    }

    #[test]
    fn test_attach_to_absent_releases() {
        let mut reg = PanelRegistry::default();
        let (p, _, released) = probe(false);
        assert!(reg.attach_renderable(PanelId(5), p).is_empty());
        assert!(released.get());
    }

    #[test]
    fn test_drop_releases_renderables() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        let (p, _, released) = probe(false);
        reg.attach_renderable(a, p);
        drop(reg);
        assert!(released.get());
    }

    #[test]
    fn test_write_rect_clamps() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        let change = reg.write_rect(a, Rect::new(-50, 900, 10, 10), false);
        assert!(change.geometry);
        assert_eq!(reg.get(a).unwrap().rect(), Rect::new(0, 540, 240, 180));
    }

    #[test]
    fn test_set_title() {
        let mut reg = PanelRegistry::default();
        let a = create(&mut reg, VisualKind::Line);
        assert!(reg.set_title(a, "Revenue").title);
        assert_eq!(reg.get(a).unwrap().title, "Revenue");
        assert!(!reg.set_title(a, "Revenue").title);
        assert!(reg.set_title(PanelId(9), "x").is_empty());
    }
}
