//! The panel entity and the visual kinds it can carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DashError, RenderError};
use crate::geometry::Rect;
use crate::renderable::{Renderable, Series};

/// Stable panel identity. Allocated from a monotonic counter and never
/// reused, even after the panel is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub u64);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v_{}", self.0)
    }
}

impl FromStr for PanelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix("v_").unwrap_or(s).parse().map(PanelId)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Visual kinds
// ────────────────────────────────────────────────────────────────────────────

/// The visual variants a panel can host.
///
/// Opaque to the engine beyond the default title and whether the kind
/// expects a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualKind {
    Pie,
    Donut,
    Treemap,
    Ribbon,
    Line,
    Area,
    StackedArea,
    ClusteredBar,
    StackedBar,
    StackedBar100,
    ClusteredColumn,
    StackedColumn,
    StackedColumn100,
    LineClusteredColumn,
    LineStackedColumn,
    Scatter,
    Image,
}

/// How a kind exposes its recolorable series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesLayout {
    /// One row per slice of the first dataset (`slice_{i}`).
    Slices,
    /// One row per treemap node (`node_{i}`).
    Nodes,
    /// One row per ribbon band (`r_{i}`).
    Bands,
    /// One row per dataset (`ds_{i}`).
    Datasets,
    /// Nothing to recolor.
    None,
}

impl VisualKind {
    pub const ALL: [VisualKind; 17] = [
        VisualKind::Pie,
        VisualKind::Donut,
        VisualKind::Treemap,
        VisualKind::Ribbon,
        VisualKind::Line,
        VisualKind::Area,
        VisualKind::StackedArea,
        VisualKind::ClusteredBar,
        VisualKind::StackedBar,
        VisualKind::StackedBar100,
        VisualKind::ClusteredColumn,
        VisualKind::StackedColumn,
        VisualKind::StackedColumn100,
        VisualKind::LineClusteredColumn,
        VisualKind::LineStackedColumn,
        VisualKind::Scatter,
        VisualKind::Image,
    ];

    /// The camelCase tag used by hosts and scripts.
    pub fn tag(self) -> &'static str {
        match self {
            VisualKind::Pie => "pie",
            VisualKind::Donut => "donut",
            VisualKind::Treemap => "treemap",
            VisualKind::Ribbon => "ribbon",
            VisualKind::Line => "line",
            VisualKind::Area => "area",
            VisualKind::StackedArea => "stackedArea",
            VisualKind::ClusteredBar => "clusteredBar",
            VisualKind::StackedBar => "stackedBar",
            VisualKind::StackedBar100 => "stackedBar100",
            VisualKind::ClusteredColumn => "clusteredColumn",
            VisualKind::StackedColumn => "stackedColumn",
            VisualKind::StackedColumn100 => "stackedColumn100",
            VisualKind::LineClusteredColumn => "lineClusteredColumn",
            VisualKind::LineStackedColumn => "lineStackedColumn",
            VisualKind::Scatter => "scatter",
            VisualKind::Image => "image",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            VisualKind::Pie => "Category share",
            VisualKind::Donut => "Category share (Donut)",
            VisualKind::Treemap => "Category treemap",
            VisualKind::Ribbon => "Ribbon (prototype)",
            VisualKind::Line => "Profit trend",
            VisualKind::Area => "Profit (Area)",
            VisualKind::StackedArea => "Profit by year (Stacked Area)",
            VisualKind::ClusteredBar => "Category comparison (Bar)",
            VisualKind::StackedBar => "Category split (Stacked Bar)",
            VisualKind::StackedBar100 => "Category split (100% Stacked Bar)",
            VisualKind::ClusteredColumn => "Monthly sales (Column)",
            VisualKind::StackedColumn => "Monthly sales split (Stacked Column)",
            VisualKind::StackedColumn100 => "Sales mix (100% Stacked Column)",
            VisualKind::LineClusteredColumn => "Sales + Profit (Combo)",
            VisualKind::LineStackedColumn => "Sales mix + Profit (Combo)",
            VisualKind::Scatter => "Sales vs Margin (Scatter)",
            VisualKind::Image => "Image",
        }
    }

    pub fn series_layout(self) -> SeriesLayout {
        match self {
            VisualKind::Pie | VisualKind::Donut => SeriesLayout::Slices,
            VisualKind::Treemap => SeriesLayout::Nodes,
            VisualKind::Ribbon => SeriesLayout::Bands,
            VisualKind::Image => SeriesLayout::None,
            _ => SeriesLayout::Datasets,
        }
    }

    pub fn is_image(self) -> bool {
        self == VisualKind::Image
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for VisualKind {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VisualKind::ALL
            .into_iter()
            .find(|k| k.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashError::UnknownKind(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Panel
// ────────────────────────────────────────────────────────────────────────────

/// One positioned, resizable unit on the canvas.
pub struct Panel {
    id: PanelId,
    kind: VisualKind,
    pub title: String,
    rect: Rect,
    z_index: i64,
    renderable: Option<Box<dyn Renderable>>,
    series: Vec<Series>,
}

impl Panel {
    pub(crate) fn new(id: PanelId, kind: VisualKind, title: String, rect: Rect, z_index: i64) -> Self {
        Self {
            id,
            kind,
            title,
            rect,
            z_index,
            renderable: None,
            series: Vec::new(),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn kind(&self) -> VisualKind {
        self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn has_renderable(&self) -> bool {
        self.renderable.is_some()
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn series_by_key(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key == key)
    }

    /// Write an already-clamped box. Returns whether anything changed.
    pub(crate) fn set_rect(&mut self, rect: Rect) -> bool {
        let changed = self.rect != rect;
        self.rect = rect;
        changed
    }

    pub(crate) fn set_z_index(&mut self, z: i64) {
        self.z_index = z;
    }

    /// Take ownership of a renderable, collect its series and let it lay
    /// itself out at the current size. Any previous renderable is released.
    pub(crate) fn attach(&mut self, renderable: Box<dyn Renderable>) -> Result<(), RenderError> {
        let released = self.release();
        self.series = renderable.series();
        self.renderable = Some(renderable);
        self.notify_resize();
        released
    }

    /// Ask the renderable (if any) to reflow at the current size.
    pub(crate) fn notify_resize(&mut self) {
        let (w, h) = (self.rect.w, self.rect.h);
        if let Some(r) = self.renderable.as_mut() {
            r.resize(w, h);
        }
    }

    /// Drop the series accessors, then release the renderable.
    pub(crate) fn release(&mut self) -> Result<(), RenderError> {
        self.series.clear();
        match self.renderable.take() {
            Some(mut r) => r.release(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("rect", &self.rect)
            .field("z_index", &self.z_index)
            .field("renderable", &self.renderable.is_some())
            .field("series", &self.series)
            .finish()
    }
}
