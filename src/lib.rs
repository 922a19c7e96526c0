//! Canvas interaction engine for fixed-size dashboard layouts.
//!
//! Panels (charts, images, KPI cards) sit at absolute pixel positions on one
//! fixed-size canvas. This crate owns the parts that are independent of any
//! UI toolkit: drag and corner-resize with boundary clamping, single
//! selection and z-ordering, and the two-way binding between the selected
//! panel and a numeric format panel.
//!
//! The host UI resolves which logical target received an input and calls
//! into [`Dashboard`]; chart engines plug in through [`Renderable`].
//!
//! The binary `dashcanvas` replays a JSON input script and prints the
//! resulting canvas.

pub mod adapter;
pub mod change;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod geometry;
pub mod interaction;
pub mod panel;
pub mod registry;
pub mod renderable;
pub mod script;
pub mod selection;

pub use change::Change;
pub use config::CanvasConfig;
pub use dashboard::{Dashboard, HostInput, Key, PendingUpload, PointerTarget};
pub use error::{DashError, RenderError, Result};
pub use format::{BoxField, FormatView, SeriesArea, SeriesRow};
pub use geometry::{Handle, Point, Rect};
pub use panel::{Panel, PanelId, VisualKind};
pub use registry::PanelRegistry;
pub use renderable::{ColorAccess, Renderable, Series};
