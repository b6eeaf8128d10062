//! Renderer trait and the SVG drawing pieces.

pub mod color;
pub mod curve;
pub mod surface;
pub mod svg;
pub mod view;

pub use color::{ColorAssignment, Rgb, color_for};
pub use surface::DrawingSurface;
pub use svg::SvgRenderer;
pub use view::ViewTransform;

use crate::error::RenderTargetError;
use crate::layout::types::LayoutResult;

/// Trait for diagram renderers.
pub trait Renderer {
    /// Draw a laid-out graph onto `surface`, appending primitives.
    ///
    /// One render per surface; nothing guards against two renders
    /// interleaving on the same surface.
    fn render(
        &self,
        layout: &LayoutResult,
        colors: &ColorAssignment,
        surface: &mut DrawingSurface,
    ) -> Result<(), RenderTargetError>;
}

/// Format a coordinate for SVG output: at most three decimals, no trailing
/// zeros, no negative zero.
pub(crate) fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
