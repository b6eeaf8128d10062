//! Node colors sampled from a cyclic cubehelix rainbow.
//!
//! A node's color depends only on its position in the traversal and the
//! node count, so two renders of the same graph agree and no palette state
//! is shared between panels.

use std::collections::HashMap;
use std::fmt;

// Cubehelix basis.
const A: f64 = -0.14861;
const B: f64 = 1.78277;
const C: f64 = -0.29227;
const D: f64 = -0.90649;
const E: f64 = 1.97294;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

fn channel(v: f64) -> u8 {
    let v = (v * 255.0).round();
    if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
}

/// Sample the rainbow at `t`; values outside `[0, 1]` wrap around.
pub fn rainbow(t: f64) -> Rgb {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let ts = (t - 0.5).abs();
    let hue = 360.0 * t - 100.0;
    let sat = 1.5 - 1.5 * ts;
    let light = 0.8 - 0.9 * ts;

    let h = (hue + 120.0).to_radians();
    let amp = sat * light * (1.0 - light);
    let (sinh, cosh) = h.sin_cos();
    Rgb {
        r: channel(light + amp * (A * cosh + B * sinh)),
        g: channel(light + amp * (C * cosh + D * sinh)),
        b: channel(light + amp * (E * cosh)),
    }
}

/// Color of the node at `index` in a traversal of `total` nodes.
pub fn color_for(index: usize, total: usize) -> Rgb {
    if total == 0 {
        return rainbow(0.0);
    }
    rainbow(index as f64 / total as f64)
}

/// Node id → color for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorAssignment {
    colors: HashMap<String, Rgb>,
}

impl ColorAssignment {
    /// Assign colors along `order` (normally [`DagGraph::traversal_order`]).
    ///
    /// [`DagGraph::traversal_order`]: crate::layout::DagGraph::traversal_order
    pub fn from_traversal(order: &[String]) -> Self {
        let total = order.len();
        let colors = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), color_for(i, total)))
            .collect();
        Self { colors }
    }

    pub fn get(&self, id: &str) -> Option<Rgb> {
        self.colors.get(id).copied()
    }

    /// Color for `id`, falling back to the palette start for unknown ids.
    pub fn color(&self, id: &str) -> Rgb {
        self.get(id).unwrap_or_else(|| rainbow(0.0))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
