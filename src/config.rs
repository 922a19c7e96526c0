//! Canvas configuration.
//!
//! The defaults describe a 1280×720 report page with "medium" 380×260
//! panels. A script or the CLI may override any field.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DashError, Result};
use crate::geometry::{Limits, Point};

/// Largest accepted `z_base`, leaving the counter room to grow.
pub const Z_BASE_MAX: i64 = i32::MAX as i64;

/// Fixed logical canvas and panel sizing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Canvas width in pixels.
    pub width: i32,
    /// Canvas height in pixels.
    pub height: i32,
    pub default_width: i32,
    pub default_height: i32,
    /// Smallest width a panel may be resized to (title + legend + plot).
    pub min_width: i32,
    /// Smallest height a panel may be resized to.
    pub min_height: i32,
    /// Position of the first panel ever created.
    pub cascade_origin: Point,
    /// Offset added per previously created panel.
    pub cascade_step: Point,
    /// Starting value of the z counter; the first panel gets `z_base + 1`.
    /// Must lie in `0..=Z_BASE_MAX`.
    pub z_base: i64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            default_width: 380,
            default_height: 260,
            min_width: 240,
            min_height: 180,
            cascade_origin: Point::new(40, 40),
            cascade_step: Point::new(18, 14),
            z_base: 10,
        }
    }
}

impl CanvasConfig {
    /// Default config with a different canvas size.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check that the minimum and default panel sizes fit the canvas.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(DashError::InvalidCanvas(format!(
                "canvas size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.min_width <= 0 || self.min_height <= 0 {
            return Err(DashError::InvalidCanvas(format!(
                "minimum panel size {}x{} must be positive",
                self.min_width, self.min_height
            )));
        }
        if self.min_width > self.width || self.min_height > self.height {
            return Err(DashError::InvalidCanvas(format!(
                "minimum panel size {}x{} exceeds canvas {}x{}",
                self.min_width, self.min_height, self.width, self.height
            )));
        }
        if self.default_width < self.min_width
            || self.default_height < self.min_height
            || self.default_width > self.width
            || self.default_height > self.height
        {
            return Err(DashError::InvalidCanvas(format!(
                "default panel size {}x{} must lie between {}x{} and {}x{}",
                self.default_width,
                self.default_height,
                self.min_width,
                self.min_height,
                self.width,
                self.height
            )));
        }
        if !(0..=Z_BASE_MAX).contains(&self.z_base) {
            return Err(DashError::InvalidCanvas(format!(
                "z base {} must lie in 0..={}",
                self.z_base, Z_BASE_MAX
            )));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            canvas_w: self.width,
            canvas_h: self.height,
            min_w: self.min_width,
            min_h: self.min_height,
        }
    }

    pub fn default_size(&self) -> (i32, i32) {
        (self.default_width, self.default_height)
    }
}

/// A `WIDTHxHEIGHT` canvas size, as accepted by `--canvas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: i32,
    pub height: i32,
}

impl FromStr for CanvasSize {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| DashError::InvalidCanvas(format!("expected WxH, got `{s}`")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i32>()
                .map_err(|_| DashError::InvalidCanvas(format!("bad dimension `{v}` in `{s}`")))
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = CanvasConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.limits().canvas_w, 1280);
        assert_eq!(cfg.default_size(), (380, 260));
    }

    #[test]
    fn test_canvas_smaller_than_minimum_rejected() {
        let cfg = CanvasConfig::with_size(200, 720);
        assert!(matches!(cfg.validate(), Err(DashError::InvalidCanvas(_))));
    }

    #[test]
    fn test_z_base_out_of_range_rejected() {
        let huge = CanvasConfig {
            z_base: i64::MAX,
            ..CanvasConfig::default()
        };
        assert!(matches!(huge.validate(), Err(DashError::InvalidCanvas(_))));
        let negative = CanvasConfig {
            z_base: -1,
            ..CanvasConfig::default()
        };
        assert!(negative.validate().is_err());
        let top = CanvasConfig {
            z_base: Z_BASE_MAX,
            ..CanvasConfig::default()
        };
        assert!(top.validate().is_ok());
    }

    #[test]
    fn test_canvas_size_parse() {
        let s: CanvasSize = "1920x1080".parse().unwrap();
        assert_eq!((s.width, s.height), (1920, 1080));
        assert!("1920".parse::<CanvasSize>().is_err());
        assert!("axb".parse::<CanvasSize>().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let cfg: CanvasConfig = serde_json::from_str(r#"{"width": 1600}"#).unwrap();
        assert_eq!(cfg.width, 1600);
        assert_eq!(cfg.height, 720);
        assert_eq!(cfg.min_width, 240);
    }
}
