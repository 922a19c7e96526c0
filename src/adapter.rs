//! Reference renderables that adapt chart, ribbon and image content to the
//! [`Renderable`] contract.
//!
//! Dataset construction, palettes and actual drawing live outside the
//! crate; these adapters hold the caller-supplied data in shared state and
//! build the per-kind [`Series`] accessors over it. Each color change bumps
//! an update counter synchronously, which is the hook a real engine would
//! use to redraw.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::color::with_alpha;
use crate::error::RenderError;
use crate::panel::{SeriesLayout, VisualKind};
use crate::renderable::{ColorAccess, Renderable, Series};

/// Fill alpha applied to datasets that have a fill when recolored.
pub const FILL_ALPHA: f32 = 0.25;

// ────────────────────────────────────────────────────────────────────────────
// Chart data
// ────────────────────────────────────────────────────────────────────────────

/// Background fill of a dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fill {
    #[default]
    None,
    Single(String),
    /// One color per data point (pie slices, treemap nodes).
    PerItem(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub label: Option<String>,
    pub border_color: Option<String>,
    pub background: Fill,
}

impl Dataset {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn border(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    pub fn fill(mut self, fill: Fill) -> Self {
        self.background = fill;
        self
    }
}

/// Caller-supplied chart content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    /// Category labels; also the slice and node labels.
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Shared engine state observed by both the renderable and its series.
#[derive(Debug, Default)]
pub struct ChartState {
    pub data: ChartData,
    /// Number of redraws triggered by color changes.
    pub updates: u32,
    /// Number of reflows requested by the canvas.
    pub resizes: u32,
    pub size: (i32, i32),
    pub released: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Chart renderable
// ────────────────────────────────────────────────────────────────────────────

pub struct ChartRenderable {
    kind: VisualKind,
    state: Rc<RefCell<ChartState>>,
}

impl ChartRenderable {
    pub fn new(kind: VisualKind, data: ChartData) -> Self {
        Self {
            kind,
            state: Rc::new(RefCell::new(ChartState {
                data,
                ..ChartState::default()
            })),
        }
    }

    /// A handle onto the engine state, for hosts that draw it.
    pub fn state(&self) -> Rc<RefCell<ChartState>> {
        Rc::clone(&self.state)
    }
}

impl Renderable for ChartRenderable {
    fn resize(&mut self, width: i32, height: i32) {
        let mut st = self.state.borrow_mut();
        st.size = (width, height);
        st.resizes += 1;
    }

    fn release(&mut self) -> Result<(), RenderError> {
        let mut st = self.state.borrow_mut();
        if st.released {
            return Err(RenderError::Released);
        }
        st.released = true;
        Ok(())
    }

    fn series(&self) -> Vec<Series> {
        let st = self.state.borrow();
        match self.kind.series_layout() {
            SeriesLayout::Slices => (0..st.data.labels.len())
                .map(|i| {
                    Series::new(
                        format!("slice_{i}"),
                        st.data.labels[i].clone(),
                        Box::new(ItemColor {
                            state: Rc::clone(&self.state),
                            index: i,
                        }),
                    )
                })
                .collect(),
            SeriesLayout::Nodes => (0..st.data.labels.len())
                .map(|i| {
                    let label = match st.data.labels[i].trim() {
                        "" => format!("Node {}", i + 1),
                        l => l.to_string(),
                    };
                    Series::new(
                        format!("node_{i}"),
                        label,
                        Box::new(ItemColor {
                            state: Rc::clone(&self.state),
                            index: i,
                        }),
                    )
                })
                .collect(),
            SeriesLayout::Datasets => st
                .data
                .datasets
                .iter()
                .enumerate()
                .map(|(i, ds)| {
                    let label = ds.label.clone().unwrap_or_else(|| format!("Series {}", i + 1));
                    Series::new(
                        format!("ds_{i}"),
                        label,
                        Box::new(DatasetColor {
                            state: Rc::clone(&self.state),
                            index: i,
                        }),
                    )
                })
                .collect(),
            SeriesLayout::Bands | SeriesLayout::None => Vec::new(),
        }
    }
}

/// Per-item color in the first dataset (pie slice, treemap node).
struct ItemColor {
    state: Rc<RefCell<ChartState>>,
    index: usize,
}

impl ColorAccess for ItemColor {
    fn color(&self) -> String {
        let st = self.state.borrow();
        match st.data.datasets.first().map(|d| &d.background) {
            Some(Fill::PerItem(colors)) => colors.get(self.index).cloned().unwrap_or_default(),
            Some(Fill::Single(c)) => c.clone(),
            _ => String::new(),
        }
    }

    fn set_color(&self, color: &str) {
        let mut st = self.state.borrow_mut();
        let index = self.index;
        let n = st.data.labels.len().max(index + 1);
        if st.data.datasets.is_empty() {
            st.data.datasets.push(Dataset::default());
        }
        let ds = &mut st.data.datasets[0];
        if !matches!(ds.background, Fill::PerItem(_)) {
            let seed = match &ds.background {
                Fill::Single(c) => c.clone(),
                _ => String::new(),
            };
            ds.background = Fill::PerItem(vec![seed; n]);
        }
        if let Fill::PerItem(colors) = &mut ds.background {
            if colors.len() <= index {
                colors.resize(index + 1, String::new());
            }
            colors[index] = color.to_string();
        }
        st.updates += 1;
    }
}

/// Whole-dataset color (line, bar, column, scatter series).
struct DatasetColor {
    state: Rc<RefCell<ChartState>>,
    index: usize,
}

impl ColorAccess for DatasetColor {
    fn color(&self) -> String {
        let st = self.state.borrow();
        let Some(ds) = st.data.datasets.get(self.index) else {
            return String::new();
        };
        if let Some(c) = &ds.border_color {
            return c.clone();
        }
        match &ds.background {
            Fill::Single(c) => c.clone(),
            Fill::PerItem(colors) => colors.first().cloned().unwrap_or_default(),
            Fill::None => String::new(),
        }
    }

    fn set_color(&self, color: &str) {
        let mut st = self.state.borrow_mut();
        let Some(ds) = st.data.datasets.get_mut(self.index) else {
            return;
        };
        if ds.border_color.is_some() {
            ds.border_color = Some(color.to_string());
        }
        if ds.background != Fill::None {
            ds.background = Fill::Single(with_alpha(color, FILL_ALPHA));
        }
        st.updates += 1;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ribbon renderable
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub color: String,
}

/// Ribbon model; re-rendered on every resize and every color change.
#[derive(Debug, Default)]
pub struct RibbonState {
    pub bands: Vec<Band>,
    pub renders: u32,
    pub size: (i32, i32),
}

pub struct RibbonRenderable {
    state: Rc<RefCell<RibbonState>>,
}

impl RibbonRenderable {
    pub fn new(bands: Vec<Band>) -> Self {
        Self {
            state: Rc::new(RefCell::new(RibbonState {
                bands,
                ..RibbonState::default()
            })),
        }
    }

    pub fn state(&self) -> Rc<RefCell<RibbonState>> {
        Rc::clone(&self.state)
    }
}

impl Renderable for RibbonRenderable {
    fn resize(&mut self, width: i32, height: i32) {
        let mut st = self.state.borrow_mut();
        st.size = (width, height);
        st.renders += 1;
    }

    fn series(&self) -> Vec<Series> {
        self.state
            .borrow()
            .bands
            .iter()
            .enumerate()
            .map(|(i, band)| {
                Series::new(
                    format!("r_{i}"),
                    band.name.clone(),
                    Box::new(BandColor {
                        state: Rc::clone(&self.state),
                        index: i,
                    }),
                )
            })
            .collect()
    }
}

struct BandColor {
    state: Rc<RefCell<RibbonState>>,
    index: usize,
}

impl ColorAccess for BandColor {
    fn color(&self) -> String {
        self.state
            .borrow()
            .bands
            .get(self.index)
            .map(|b| b.color.clone())
            .unwrap_or_default()
    }

    fn set_color(&self, color: &str) {
        let mut st = self.state.borrow_mut();
        if let Some(band) = st.bands.get_mut(self.index) {
            band.color = color.to_string();
            st.renders += 1;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Image renderable
// ────────────────────────────────────────────────────────────────────────────

/// An uploaded image, typically a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub data_url: String,
}

impl ImagePayload {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
        }
    }
}

/// An image scaled to fit its panel. Exposes no series.
pub struct ImageRenderable {
    payload: ImagePayload,
    size: (i32, i32),
}

impl ImageRenderable {
    pub fn new(payload: ImagePayload) -> Self {
        Self { payload, size: (0, 0) }
    }

    pub fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }
}

impl Renderable for ImageRenderable {
    fn resize(&mut self, width: i32, height: i32) {
        self.size = (width, height);
    }

    fn series(&self) -> Vec<Series> {
        Vec::new()
    }
}
