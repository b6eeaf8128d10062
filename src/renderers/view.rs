//! Pan/zoom transform applied to the group holding every node and edge.
//!
//! Scale and translation are unbounded. The transform belongs to one
//! surface and is rebuilt from the view policy whenever a panel is created.

use crate::layout::Point;

use super::num;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Scale factor.
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Scale content spanning `lo..hi` (padded by `margin` on every side)
    /// to fit a `width × height` viewport, centered on both axes.
    pub fn auto_fit(lo: Point, hi: Point, margin: f64, width: f64, height: f64) -> Self {
        let content_w = (hi.x - lo.x) + 2.0 * margin;
        let content_h = (hi.y - lo.y) + 2.0 * margin;
        let k = match (content_w > 0.0, content_h > 0.0) {
            (true, true) => (width / content_w).min(height / content_h),
            (true, false) => width / content_w,
            (false, true) => height / content_h,
            (false, false) => 1.0,
        };
        let cx = (lo.x + hi.x) / 2.0;
        let cy = (lo.y + hi.y) / 2.0;
        Self {
            k,
            x: width / 2.0 - k * cx,
            y: height / 2.0 - k * cy,
        }
    }

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Multiply the scale by `factor`, keeping the screen point `anchor`
    /// fixed.
    pub fn zoom_by(&mut self, factor: f64, anchor: Point) {
        self.x = anchor.x - (anchor.x - self.x) * factor;
        self.y = anchor.y - (anchor.y - self.y) * factor;
        self.k *= factor;
    }

    /// Map a drawing-space point to screen space.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Value of the SVG `transform` attribute.
    pub fn to_attr(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            num(self.x),
            num(self.y),
            num(self.k)
        )
    }
}
