//! The narrow contract between the canvas engine and external renderers.
//!
//! A panel may own one [`Renderable`] (a chart, a ribbon, an image). The
//! engine only ever asks it to reflow after a geometry change, to release
//! itself on deletion, and to hand out its recolorable [`Series`].

use std::fmt;

use crate::error::RenderError;

/// An external chart/image object owned by a panel.
pub trait Renderable {
    /// Reflow content after the owning panel changed size.
    ///
    /// Called after every resize frame and every committed format edit.
    fn resize(&mut self, width: i32, height: i32);

    /// Tear down engine resources. Failures are logged and ignored by the
    /// registry; a broken renderable never blocks deletion.
    fn release(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// The ordered list of recolorable sub-elements. Built once by the
    /// adapter when the renderable is attached to a panel.
    fn series(&self) -> Vec<Series>;
}

/// Get/set capability over one series color.
///
/// Implementations share state with their renderable, so both methods take
/// `&self` and mutate through interior mutability.
pub trait ColorAccess {
    fn color(&self) -> String;
    fn set_color(&self, color: &str);
}

/// One recolorable series (chart dataset, pie slice, ribbon band).
pub struct Series {
    pub key: String,
    pub label: String,
    access: Box<dyn ColorAccess>,
}

impl Series {
    pub fn new(key: impl Into<String>, label: impl Into<String>, access: Box<dyn ColorAccess>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            access,
        }
    }

    pub fn color(&self) -> String {
        self.access.color()
    }

    pub fn set_color(&self, color: &str) {
        self.access.set_color(color);
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("color", &self.color())
            .finish()
    }
}
