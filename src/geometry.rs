//! Pixel geometry for panels on the fixed-size canvas.
//!
//! Every position or size written to a panel goes through [`clamp_box`],
//! [`drag_to`] or [`resize_from`], so that after any mutation
//! `0 <= x <= W - w`, `0 <= y <= H - h`, `w >= min_w` and `h >= min_h`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashError;

/// Bound `n` to `[min, max]`.
///
/// Never panics. If a caller passes `min > max` the result is `min`.
pub fn clamp(n: i32, min: i32, max: i32) -> i32 {
    n.min(max).max(min)
}

/// A pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - origin`, saturating at the `i32` bounds.
    pub fn delta_from(self, origin: Point) -> (i32, i32) {
        (self.x.saturating_sub(origin.x), self.y.saturating_sub(origin.y))
    }
}

/// A panel box: top-left offset within the canvas plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// True when this box satisfies every canvas invariant under `limits`.
    pub fn fits(&self, limits: &Limits) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() <= limits.canvas_w
            && self.bottom() <= limits.canvas_h
            && self.w >= limits.min_w
            && self.h >= limits.min_h
    }
}

/// The read-only bounds every clamp operation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub canvas_w: i32,
    pub canvas_h: i32,
    pub min_w: i32,
    pub min_h: i32,
}

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::Ne => "ne",
            Handle::Sw => "sw",
            Handle::Se => "se",
        }
    }

    /// Whether dragging this handle moves the left edge.
    fn moves_left(self) -> bool {
        matches!(self, Handle::Nw | Handle::Sw)
    }

    /// Whether dragging this handle moves the top edge.
    fn moves_top(self) -> bool {
        matches!(self, Handle::Nw | Handle::Ne)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nw" => Ok(Handle::Nw),
            "ne" => Ok(Handle::Ne),
            "sw" => Ok(Handle::Sw),
            "se" => Ok(Handle::Se),
            other => Err(DashError::UnknownHandle(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Clamping
// ────────────────────────────────────────────────────────────────────────────

/// Re-clamp the position of `r` so the box stays inside the canvas.
/// The size is left untouched.
pub fn clamp_position(r: Rect, limits: &Limits) -> Rect {
    Rect {
        x: clamp(r.x, 0, limits.canvas_w - r.w),
        y: clamp(r.y, 0, limits.canvas_h - r.h),
        ..r
    }
}

/// Apply the size limits (minimum, then canvas size), then re-clamp the
/// position against the possibly-new size.
pub fn clamp_box(r: Rect, limits: &Limits) -> Rect {
    let w = clamp(r.w, limits.min_w, limits.canvas_w);
    let h = clamp(r.h, limits.min_h, limits.canvas_h);
    clamp_position(Rect { w, h, ..r }, limits)
}

/// Candidate box for a drag of `orig` by `(dx, dy)`.
///
/// A drag never changes the size.
pub fn drag_to(orig: Rect, dx: i32, dy: i32, limits: &Limits) -> Rect {
    clamp_position(
        Rect {
            x: orig.x.saturating_add(dx),
            y: orig.y.saturating_add(dy),
            ..orig
        },
        limits,
    )
}

/// Candidate box for a corner resize, computed from the session snapshot
/// `orig` each frame rather than incrementally.
pub fn resize_from(orig: Rect, handle: Handle, dx: i32, dy: i32, limits: &Limits) -> Rect {
    let mut r = orig;
    if handle.moves_left() {
        r.w = orig.w.saturating_sub(dx);
        r.x = orig.x.saturating_add(dx);
    } else {
        r.w = orig.w.saturating_add(dx);
    }
    if handle.moves_top() {
        r.h = orig.h.saturating_sub(dy);
        r.y = orig.y.saturating_add(dy);
    } else {
        r.h = orig.h.saturating_add(dy);
    }
    clamp_box(r, limits)
}

/// Default position for the `n`-th panel ever created (0-based), cascaded
/// diagonally from `origin` and clamped so a `size` box fits the canvas.
pub fn cascade_origin(n: u64, origin: Point, step: Point, size: (i32, i32), limits: &Limits) -> Point {
    let n = i32::try_from(n).unwrap_or(i32::MAX);
    let x = origin.x.saturating_add(step.x.saturating_mul(n));
    let y = origin.y.saturating_add(step.y.saturating_mul(n));
    Point {
        x: clamp(x, 0, limits.canvas_w - size.0),
        y: clamp(y, 0, limits.canvas_h - size.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits {
            canvas_w: 1280,
            canvas_h: 720,
            min_w: 240,
            min_h: 180,
        }
    }

    #[test]
    fn test_clamp_basic() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
    }

    #[test]
    fn test_clamp_inverted_bounds_returns_min() {
        assert_eq!(clamp(3, 10, 0), 10);
    }

    #[test]
    fn test_drag_clamps_to_canvas() {
        let orig = Rect::new(40, 40, 380, 260);
        let r = drag_to(orig, 2000, 0, &limits());
        assert_eq!(r, Rect::new(900, 40, 380, 260));
        let r = drag_to(orig, -500, -500, &limits());
        assert_eq!(r, Rect::new(0, 0, 380, 260));
    }

    #[test]
    fn test_resize_se_only_changes_size() {
        let orig = Rect::new(100, 100, 380, 260);
        let r = resize_from(orig, Handle::Se, 20, 30, &limits());
        assert_eq!(r, Rect::new(100, 100, 400, 290));
    }

    #[test]
    fn test_resize_nw_moves_origin() {
        let orig = Rect::new(100, 100, 380, 260);
        let r = resize_from(orig, Handle::Nw, -20, -30, &limits());
        assert_eq!(r, Rect::new(80, 70, 400, 290));
    }

    #[test]
    fn test_resize_sw_and_ne() {
        let orig = Rect::new(100, 100, 380, 260);
        let sw = resize_from(orig, Handle::Sw, 10, 10, &limits());
        assert_eq!(sw, Rect::new(110, 100, 370, 270));
        let ne = resize_from(orig, Handle::Ne, 10, 10, &limits());
        assert_eq!(ne, Rect::new(100, 110, 390, 250));
    }

    #[test]
    fn test_resize_respects_minimum() {
        let orig = Rect::new(100, 100, 380, 260);
        let r = resize_from(orig, Handle::Se, -1000, -1000, &limits());
        assert_eq!((r.w, r.h), (240, 180));
    }

    #[test]
    fn test_resize_past_canvas_edge_stays_inside() {
        let orig = Rect::new(900, 40, 380, 260);
        let r = resize_from(orig, Handle::Se, 500, 0, &limits());
        assert!(r.fits(&limits()), "{r:?}");
        assert_eq!(r.right(), 1280);
    }

    #[test]
    fn test_resize_larger_than_canvas_is_capped() {
        let orig = Rect::new(0, 0, 380, 260);
        let r = resize_from(orig, Handle::Se, 5000, 5000, &limits());
        assert_eq!(r, Rect::new(0, 0, 1280, 720));
    }

    #[test]
    fn test_clamp_box_reclamps_position_after_grow() {
        let r = clamp_box(Rect::new(1200, 700, 500, 300), &limits());
        assert_eq!(r, Rect::new(780, 420, 500, 300));
    }

    #[test]
    fn test_extreme_deltas_saturate() {
        let far = Point::new(i32::MAX, i32::MIN);
        assert_eq!(far.delta_from(Point::new(-10, 10)), (i32::MAX, i32::MIN));

        let orig = Rect::new(40, 40, 380, 260);
        for (dx, dy) in [(i32::MAX, i32::MAX), (i32::MIN, i32::MIN), (i32::MAX, i32::MIN)] {
            assert!(drag_to(orig, dx, dy, &limits()).fits(&limits()));
            for handle in Handle::ALL {
                let r = resize_from(orig, handle, dx, dy, &limits());
                assert!(r.fits(&limits()), "{handle} {dx} {dy}: {r:?}");
            }
        }
    }

    #[test]
    fn test_cascade_origin() {
        let l = limits();
        let o = Point::new(40, 40);
        let s = Point::new(18, 14);
        assert_eq!(cascade_origin(0, o, s, (380, 260), &l), Point::new(40, 40));
        assert_eq!(cascade_origin(1, o, s, (380, 260), &l), Point::new(58, 54));
        let far = cascade_origin(1000, o, s, (380, 260), &l);
        assert_eq!(far, Point::new(900, 460));
    }

    #[test]
    fn test_handle_parse() {
        assert_eq!("SE".parse::<Handle>().unwrap(), Handle::Se);
        assert!("middle".parse::<Handle>().is_err());
    }
}
