//! The canvas session: one explicit context object holding the registry,
//! the interaction controller and the format panel.
//!
//! Hosts resolve which logical target received an input (panel header,
//! corner handle, delete control, panel body, background, format field)
//! and call one method here, or feed a [`HostInput`] to
//! [`Dashboard::handle`]. Every call returns a [`Change`] describing what
//! to redraw; the format panel is kept in sync before the call returns.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::{Band, ChartData, ChartRenderable, ImagePayload, ImageRenderable, RibbonRenderable};
use crate::change::Change;
use crate::config::CanvasConfig;
use crate::error::Result;
use crate::format::{BoxField, FormatPanel, FormatView};
use crate::geometry::{Handle, Point};
use crate::interaction::InteractionController;
use crate::panel::{PanelId, VisualKind};
use crate::registry::PanelRegistry;
use crate::renderable::Renderable;

// ────────────────────────────────────────────────────────────────────────────
// Host input
// ────────────────────────────────────────────────────────────────────────────

/// The logical target of a pointer-down, as resolved by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "camelCase")]
pub enum PointerTarget {
    /// Panel header, excluding the delete control. Starts a drag.
    Header { panel: PanelId },
    /// A corner resize handle. Starts a resize.
    Handle { panel: PanelId, handle: Handle },
    /// The delete control in a panel header.
    Delete { panel: PanelId },
    /// Anywhere else on a panel. Selects it.
    Body { panel: PanelId },
    /// Empty canvas. Clears the selection.
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    #[serde(other)]
    Other,
}

/// One discrete host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostInput {
    /// Add a panel. `chart` / `bands` supply renderable content; for the
    /// image kind, `image` is the upload result (`None` = cancelled).
    AddVisual {
        kind: VisualKind,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        chart: Option<ChartData>,
        #[serde(default)]
        bands: Option<Vec<Band>>,
        #[serde(default)]
        image: Option<ImagePayload>,
    },
    PointerDown { target: PointerTarget, x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp,
    Key { key: Key },
    TitleInput { text: String },
    FieldInput { field: BoxField, text: String },
    /// Change/blur on a box field.
    CommitBox,
    SeriesColor { key: String, color: String },
    BringToFront,
}

/// Token for an image panel whose upload has not resolved yet.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an unresolved upload leaves an empty image panel on the canvas"]
pub struct PendingUpload {
    panel: PanelId,
}

impl PendingUpload {
    pub fn panel(&self) -> PanelId {
        self.panel
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

pub struct Dashboard {
    registry: PanelRegistry,
    interaction: InteractionController,
    format: FormatPanel,
}

impl Default for Dashboard {
    fn default() -> Self {
        let mut dash = Self {
            registry: PanelRegistry::default(),
            interaction: InteractionController::new(),
            format: FormatPanel::new(),
        };
        dash.format.render(&dash.registry);
        dash
    }
}

impl Dashboard {
    /// Create an empty canvas after validating `config`.
    pub fn new(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let mut dash = Self {
            registry: PanelRegistry::new(config),
            interaction: InteractionController::new(),
            format: FormatPanel::new(),
        };
        dash.format.render(&dash.registry);
        Ok(dash)
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn format(&self) -> &FormatView {
        self.format.view()
    }

    pub fn selected(&self) -> Option<PanelId> {
        self.registry.selected()
    }

    /// Bring the format panel in line with whatever `change` touched.
    fn settle(&mut self, change: Change) -> Change {
        if change.needs_format_render() {
            self.format.render(&self.registry);
            return change;
        }
        let touches_selected = change.panel.is_some() && change.panel == self.registry.selected();
        if touches_selected && change.geometry {
            self.format.sync_geometry(&self.registry);
        }
        if touches_selected && change.colors {
            self.format.sync_colors(&self.registry);
        }
        change
    }

    // ────────────────────────────────────────────────────────────────────────
    // Panels
    // ────────────────────────────────────────────────────────────────────────

    /// Add a panel of `kind` with its default title.
    pub fn add_visual(&mut self, kind: VisualKind, renderable: Option<Box<dyn Renderable>>) -> Change {
        self.add_visual_titled(kind, kind.default_title(), renderable)
    }

    /// Add a panel with an explicit default title. The change always names
    /// the new panel.
    pub fn add_visual_titled(
        &mut self,
        kind: VisualKind,
        title: &str,
        renderable: Option<Box<dyn Renderable>>,
    ) -> Change {
        let mut change = self.registry.create_panel(kind, title);
        if let (Some(id), Some(r)) = (change.panel, renderable) {
            change = change.merge(self.registry.attach_renderable(id, r));
        }
        self.settle(change)
    }

    /// Give an existing panel its renderable.
    pub fn attach(&mut self, id: PanelId, renderable: Box<dyn Renderable>) -> Change {
        let change = self.registry.attach_renderable(id, renderable);
        self.settle(change)
    }

    pub fn delete_panel(&mut self, id: PanelId) -> Change {
        let change = self.registry.delete_panel(id);
        self.settle(change)
    }

    pub fn select(&mut self, id: PanelId) -> Change {
        let change = self.registry.select(id);
        self.settle(change)
    }

    pub fn deselect_all(&mut self) -> Change {
        let change = self.registry.deselect_all();
        self.settle(change)
    }

    pub fn bring_to_front(&mut self, id: PanelId) -> Change {
        let change = self.registry.bring_to_front(id);
        self.settle(change)
    }

    /// Remove every panel. Counters keep running.
    pub fn clear(&mut self) -> Change {
        self.interaction.pointer_up();
        let change = self.registry.clear();
        self.settle(change)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Image upload
    // ────────────────────────────────────────────────────────────────────────

    /// Create the shell image panel ahead of an asynchronous upload.
    pub fn begin_image(&mut self) -> PendingUpload {
        let change = self.registry.create_panel(VisualKind::Image, VisualKind::Image.default_title());
        self.settle(change);
        let panel = change.panel.unwrap_or(PanelId(self.registry.created_count()));
        PendingUpload { panel }
    }

    /// Resolve an upload. A missing or empty payload removes the shell panel.
    pub fn finish_image(&mut self, pending: PendingUpload, payload: Option<ImagePayload>) -> Change {
        match payload.filter(|p| !p.data_url.trim().is_empty()) {
            Some(payload) => self.attach(pending.panel, Box::new(ImageRenderable::new(payload))),
            None => {
                debug!(panel = %pending.panel, "image upload cancelled; removing shell panel");
                self.delete_panel(pending.panel)
            }
        }
    }

    /// Run both upload phases with a synchronous supplier.
    pub fn add_image_with<F>(&mut self, supplier: F) -> Change
    where
        F: FnOnce() -> Option<ImagePayload>,
    {
        let pending = self.begin_image();
        let id = pending.panel();
        let change = self.finish_image(pending, supplier());
        Change {
            panel: Some(id),
            registry: true,
            selection: true,
            ..change
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Pointer and keyboard
    // ────────────────────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, target: PointerTarget, at: Point) -> Change {
        let change = match target {
            PointerTarget::Header { panel } => self.interaction.begin_drag(&mut self.registry, panel, at),
            PointerTarget::Handle { panel, handle } => {
                self.interaction.begin_resize(&mut self.registry, panel, handle, at)
            }
            PointerTarget::Delete { panel } => self.registry.delete_panel(panel),
            PointerTarget::Body { panel } => self.interaction.press_panel(&mut self.registry, panel),
            PointerTarget::Background => self.interaction.press_background(&mut self.registry),
        };
        self.settle(change)
    }

    pub fn pointer_move(&mut self, at: Point) -> Change {
        let change = self.interaction.pointer_move(&mut self.registry, at);
        self.settle(change)
    }

    pub fn pointer_up(&mut self) -> Change {
        self.interaction.pointer_up()
    }

    /// Delete/Backspace remove the selected panel, even mid-drag; the
    /// session then ends on the next pointer-move. Escape clears the
    /// selection but is ignored while a drag or resize is in progress.
    pub fn key(&mut self, key: Key) -> Change {
        match key {
            Key::Delete | Key::Backspace => match self.registry.selected() {
                Some(id) => self.delete_panel(id),
                None => Change::none(),
            },
            Key::Escape if self.interaction.is_active() => Change::none(),
            Key::Escape => self.deselect_all(),
            Key::Other => Change::none(),
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Format panel
    // ────────────────────────────────────────────────────────────────────────

    pub fn input_title(&mut self, text: &str) -> Change {
        let change = self.format.input_title(&mut self.registry, text);
        self.settle(change)
    }

    pub fn input_field(&mut self, field: BoxField, text: &str) {
        self.format.input_field(field, text);
    }

    pub fn commit_box(&mut self) -> Change {
        let change = self.format.commit_box(&mut self.registry);
        self.settle(change)
    }

    pub fn input_series_color(&mut self, key: &str, color: &str) -> Change {
        let change = self.format.input_series_color(&mut self.registry, key, color);
        self.settle(change)
    }

    /// The format panel's "bring to front" button.
    pub fn bring_selected_to_front(&mut self) -> Change {
        let change = self.format.bring_to_front(&mut self.registry);
        self.settle(change)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ────────────────────────────────────────────────────────────────────────

    pub fn handle(&mut self, input: HostInput) -> Change {
        match input {
            HostInput::AddVisual {
                kind,
                title,
                chart,
                bands,
                image,
            } => {
                if kind.is_image() {
                    return self.add_image_with(|| image);
                }
                let renderable: Option<Box<dyn Renderable>> = match (chart, bands) {
                    (_, Some(bands)) if kind == VisualKind::Ribbon => Some(Box::new(RibbonRenderable::new(bands))),
                    (Some(data), _) => Some(Box::new(ChartRenderable::new(kind, data))),
                    _ => None,
                };
                let title = title.unwrap_or_else(|| kind.default_title().to_string());
                self.add_visual_titled(kind, &title, renderable)
            }
            HostInput::PointerDown { target, x, y } => self.pointer_down(target, Point::new(x, y)),
            HostInput::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            HostInput::PointerUp => self.pointer_up(),
            HostInput::Key { key } => self.key(key),
            HostInput::TitleInput { text } => self.input_title(&text),
            HostInput::FieldInput { field, text } => {
                self.input_field(field, &text);
                Change::none()
            }
            HostInput::CommitBox => self.commit_box(),
            HostInput::SeriesColor { key, color } => self.input_series_color(&key, &color),
            HostInput::BringToFront => self.bring_selected_to_front(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{EMPTY_NO_SELECTION, STATUS_NONE, SeriesArea};

    #[test]
    fn test_new_dashboard_shows_blank_format() {
        let dash = Dashboard::default();
        assert_eq!(dash.format().status, STATUS_NONE);
        assert!(dash.registry().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Dashboard::new(CanvasConfig::with_size(100, 100)).is_err());
    }

    #[test]
    fn test_drag_pushes_live_values_to_format() {
        let mut dash = Dashboard::default();
        let a = dash.add_visual(VisualKind::Line, None).panel.unwrap();
        dash.pointer_down(PointerTarget::Header { panel: a }, Point::new(50, 50));
        dash.pointer_move(Point::new(60, 70));
        assert_eq!(dash.format().x, "50");
        assert_eq!(dash.format().y, "60");
        dash.pointer_up();
    }

    #[test]
    fn test_delete_control_removes_panel() {
        let mut dash = Dashboard::default();
        let a = dash.add_visual(VisualKind::Line, None).panel.unwrap();
        let change = dash.pointer_down(PointerTarget::Delete { panel: a }, Point::new(0, 0));
        assert!(change.registry);
        assert!(dash.registry().is_empty());
        assert!(!dash.interaction().is_active());
        assert_eq!(dash.format().series, SeriesArea::Empty(EMPTY_NO_SELECTION.into()));
    }

    #[test]
    fn test_escape_ignored_during_session() {
        let mut dash = Dashboard::default();
        let a = dash.add_visual(VisualKind::Line, None).panel.unwrap();
        dash.pointer_down(PointerTarget::Handle { panel: a, handle: Handle::Se }, Point::new(0, 0));
        assert!(dash.key(Key::Escape).is_empty());
        assert_eq!(dash.selected(), Some(a));
        dash.pointer_up();
        dash.key(Key::Escape);
        assert_eq!(dash.selected(), None);
    }

    #[test]
    fn test_delete_during_drag_removes_panel() {
        let mut dash = Dashboard::default();
        let a = dash.add_visual(VisualKind::Line, None).panel.unwrap();
        dash.pointer_down(PointerTarget::Header { panel: a }, Point::new(0, 0));
        let change = dash.key(Key::Delete);
        assert!(change.registry);
        assert!(!dash.registry().contains(a));
        assert_eq!(dash.selected(), None);
        assert_eq!(dash.format().status, STATUS_NONE);

        assert!(dash.pointer_move(Point::new(30, 30)).is_empty());
        assert!(!dash.interaction().is_active());
    }

    #[test]
    fn test_backspace_deletes_selected() {
        let mut dash = Dashboard::default();
        dash.add_visual(VisualKind::Line, None);
        dash.key(Key::Backspace);
        assert!(dash.registry().is_empty());
        assert!(dash.key(Key::Backspace).is_empty());
    }

    #[test]
    fn test_cancelled_upload_removes_shell() {
        let mut dash = Dashboard::default();
        let pending = dash.begin_image();
        assert!(dash.registry().contains(pending.panel()));
        assert_eq!(dash.format().status, "IMAGE selected");
        let id = pending.panel();
        dash.finish_image(pending, None);
        assert!(!dash.registry().contains(id));
        assert_eq!(dash.selected(), None);
    }

    #[test]
    fn test_successful_upload_attaches_image() {
        let mut dash = Dashboard::default();
        let change = dash.add_image_with(|| Some(ImagePayload::new("data:image/png;base64,AAAA")));
        let id = change.panel.unwrap();
        let panel = dash.registry().get(id).unwrap();
        assert!(panel.has_renderable());
        assert!(panel.series().is_empty());
    }

    #[test]
    fn test_empty_payload_is_treated_as_cancel() {
        let mut dash = Dashboard::default();
        let change = dash.add_image_with(|| Some(ImagePayload::new("  ")));
        assert!(!dash.registry().contains(change.panel.unwrap()));
    }

    #[test]
    fn test_handle_parses_script_inputs() {
        let inputs: Vec<HostInput> = serde_json::from_str(
            r#"[
                {"type": "addVisual", "kind": "line"},
                {"type": "pointerDown", "target": {"on": "header", "panel": 1}, "x": 0, "y": 0},
                {"type": "pointerMove", "x": 10, "y": 5},
                {"type": "pointerUp"},
                {"type": "key", "key": "escape"},
                {"type": "key", "key": "F5"}
            ]"#,
        )
        .unwrap();
        let mut dash = Dashboard::default();
        for input in inputs {
            dash.handle(input);
        }
        assert_eq!(dash.registry().get(PanelId(1)).unwrap().rect().x, 50);
        assert_eq!(dash.selected(), None);
    }
}
