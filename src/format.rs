//! Two-way binding between the selected panel and the format panel fields.
//!
//! Read path: [`FormatPanel::render`] rebuilds every field from the
//! registry whenever the selection or the registry changes, and
//! [`FormatPanel::sync_geometry`] refreshes only the box fields during a
//! drag or resize.
//!
//! Write path: title edits apply per keystroke, box edits apply on commit
//! (change/blur) through the same clamping as interactive resize, and
//! series color edits call the series' `set_color` immediately.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::change::Change;
use crate::color::normalize_to_hex;
use crate::geometry::{Rect, clamp_box};
use crate::panel::{Panel, PanelId};
use crate::registry::PanelRegistry;

pub const STATUS_NONE: &str = "Select a visual to format";
pub const EMPTY_NO_SELECTION: &str = "No visual selected.";
pub const EMPTY_NO_SERIES: &str = "No series to format for this visual.";

/// One of the four numeric box fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxField {
    X,
    Y,
    W,
    H,
}

/// One editable color row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRow {
    pub key: String,
    pub label: String,
    /// Always `#rrggbb`.
    pub color: String,
}

/// Content of the series-color area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum SeriesArea {
    Empty(String),
    Rows(Vec<SeriesRow>),
}

/// Everything a host needs to draw the format panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatView {
    pub status: String,
    /// Whether the title and box fields accept input.
    pub enabled: bool,
    pub title: String,
    pub x: String,
    pub y: String,
    pub w: String,
    pub h: String,
    pub bring_to_front_enabled: bool,
    pub series: SeriesArea,
}

impl FormatView {
    fn blank() -> Self {
        Self {
            status: STATUS_NONE.to_string(),
            enabled: false,
            title: String::new(),
            x: String::new(),
            y: String::new(),
            w: String::new(),
            h: String::new(),
            bring_to_front_enabled: false,
            series: SeriesArea::Empty(EMPTY_NO_SELECTION.to_string()),
        }
    }

    pub fn field(&self, field: BoxField) -> &str {
        match field {
            BoxField::X => &self.x,
            BoxField::Y => &self.y,
            BoxField::W => &self.w,
            BoxField::H => &self.h,
        }
    }

    fn field_mut(&mut self, field: BoxField) -> &mut String {
        match field {
            BoxField::X => &mut self.x,
            BoxField::Y => &mut self.y,
            BoxField::W => &mut self.w,
            BoxField::H => &mut self.h,
        }
    }

    /// The color row for `key`, if shown.
    pub fn series_row(&self, key: &str) -> Option<&SeriesRow> {
        match &self.series {
            SeriesArea::Rows(rows) => rows.iter().find(|r| r.key == key),
            SeriesArea::Empty(_) => None,
        }
    }

    fn set_box(&mut self, r: Rect) {
        self.x = r.x.to_string();
        self.y = r.y.to_string();
        self.w = r.w.to_string();
        self.h = r.h.to_string();
    }
}

/// The format panel model.
#[derive(Debug, Clone)]
pub struct FormatPanel {
    view: FormatView,
}

impl Default for FormatPanel {
    fn default() -> Self {
        Self {
            view: FormatView::blank(),
        }
    }
}

impl FormatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &FormatView {
        &self.view
    }

    // ────────────────────────────────────────────────────────────────────────
    // Read path
    // ────────────────────────────────────────────────────────────────────────

    /// Rebuild every field from the current selection.
    pub fn render(&mut self, registry: &PanelRegistry) {
        let Some(panel) = registry.selected_panel() else {
            self.view = FormatView::blank();
            return;
        };
        self.view = FormatView {
            status: format!("{} selected", panel.kind().tag().to_uppercase()),
            enabled: true,
            title: panel.title.clone(),
            x: String::new(),
            y: String::new(),
            w: String::new(),
            h: String::new(),
            bring_to_front_enabled: true,
            series: series_area(panel),
        };
        self.view.set_box(panel.rect());
    }

    /// Push the selected panel's box into the numeric fields.
    /// Does nothing when nothing is selected.
    pub fn sync_geometry(&mut self, registry: &PanelRegistry) {
        if let Some(panel) = registry.selected_panel() {
            self.view.set_box(panel.rect());
        }
    }

    /// Refresh the color rows of the selected panel from its series.
    pub fn sync_colors(&mut self, registry: &PanelRegistry) {
        if let Some(panel) = registry.selected_panel() {
            self.view.series = series_area(panel);
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Write path
    // ────────────────────────────────────────────────────────────────────────

    /// A keystroke in the title field. Applies to the panel immediately.
    pub fn input_title(&mut self, registry: &mut PanelRegistry, text: &str) -> Change {
        let Some(id) = registry.selected() else {
            return Change::none();
        };
        self.view.title = text.to_string();
        registry.set_title(id, text)
    }

    /// A keystroke in a box field. Nothing is applied until [`Self::commit_box`].
    pub fn input_field(&mut self, field: BoxField, text: &str) {
        if self.view.enabled {
            *self.view.field_mut(field) = text.to_string();
        }
    }

    /// Change/blur on any box field: read all four, default blanks and junk
    /// to the panel's current values, clamp, write, and show the clamped
    /// truth in the fields.
    pub fn commit_box(&mut self, registry: &mut PanelRegistry) -> Change {
        let Some(panel) = registry.selected_panel() else {
            return Change::none();
        };
        let id = panel.id();
        let prev = panel.rect();
        let requested = Rect {
            x: parse_field(&self.view.x, prev.x),
            y: parse_field(&self.view.y, prev.y),
            w: parse_field(&self.view.w, prev.w),
            h: parse_field(&self.view.h, prev.h),
        };
        let clamped = clamp_box(requested, &registry.config().limits());
        if clamped != requested {
            trace!(panel = %id, ?requested, ?clamped, "format box clamped");
        }
        let change = registry.write_rect(id, clamped, true);
        self.sync_geometry(registry);
        change
    }

    /// A color picked for series `key` of the selected panel.
    pub fn input_series_color(&mut self, registry: &mut PanelRegistry, key: &str, color: &str) -> Change {
        let Some(id) = registry.selected() else {
            return Change::none();
        };
        let change = registry.set_series_color(id, key, color);
        if change.colors {
            self.refresh_row(registry, id, key);
        }
        change
    }

    /// "Bring to front" button. Disabled without a selection.
    pub fn bring_to_front(&mut self, registry: &mut PanelRegistry) -> Change {
        match registry.selected() {
            Some(id) => registry.bring_to_front(id),
            None => Change::none(),
        }
    }

    fn refresh_row(&mut self, registry: &PanelRegistry, id: PanelId, key: &str) {
        let Some(series) = registry.get(id).and_then(|p| p.series_by_key(key)) else {
            return;
        };
        if let SeriesArea::Rows(rows) = &mut self.view.series {
            if let Some(row) = rows.iter_mut().find(|r| r.key == key) {
                row.color = normalize_to_hex(&series.color());
            }
        }
    }
}

fn series_area(panel: &Panel) -> SeriesArea {
    if panel.series().is_empty() {
        return SeriesArea::Empty(EMPTY_NO_SERIES.to_string());
    }
    SeriesArea::Rows(
        panel
            .series()
            .iter()
            .map(|s| SeriesRow {
                key: s.key.clone(),
                label: s.label.clone(),
                color: normalize_to_hex(&s.color()),
            })
            .collect(),
    )
}

/// Parse a numeric field leniently: leading integer digits win ("120px"
/// reads as 120), fractions are truncated, anything else falls back.
fn parse_field(text: &str, fallback: i32) -> i32 {
    let t = text.trim();
    if let Ok(v) = t.parse::<i64>() {
        return v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    }
    if let Ok(v) = t.parse::<f64>() {
        if v.is_finite() {
            return v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
        }
    }
    let sign_len = usize::from(t.starts_with(['-', '+']));
    let digits = t[sign_len..].chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return fallback;
    }
    t[..sign_len + digits]
        .parse::<i64>()
        .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .unwrap_or(fallback)
}
