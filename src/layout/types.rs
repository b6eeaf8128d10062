//! Layout types: Point, LayoutNode, LayoutEdge, LayoutSize, LayoutResult.

// ─── Constants ────────────────────────────────────────────────────────────────

pub const DUMMY_PREFIX: &str = "__dummy_";

// ─── Point ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─── LayoutSize ──────────────────────────────────────────────────────────────

/// Target box the layout is scaled into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSize {
    pub width: f64,
    pub height: f64,
}

impl LayoutSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─── LayoutNode ───────────────────────────────────────────────────────────────

/// A node with its rank and computed center.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub layer: usize,
    /// Position within the layer after crossing minimisation.
    pub order: usize,
    pub x: f64,
    pub y: f64,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, layer: usize, order: usize, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            layer,
            order,
            x,
            y,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ─── LayoutEdge ───────────────────────────────────────────────────────────────

/// A parent → child edge and the points its curve passes through.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub source: String,
    pub target: String,
    /// Source center, one point per skipped layer, target center.
    pub points: Vec<Point>,
}

impl LayoutEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            points: Vec::new(),
        }
    }
}

// ─── LayoutResult ─────────────────────────────────────────────────────────────

/// The full output of the layout pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Real nodes only, in layer then order sequence.
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub layer_count: usize,
    pub size: LayoutSize,
}

impl LayoutResult {
    pub fn new(size: LayoutSize) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            layer_count: 0,
            size,
        }
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Bounding box `(min, max)` of node centers and routing points, or
    /// `None` for an empty layout.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let points = self
            .nodes
            .iter()
            .map(LayoutNode::center)
            .chain(self.edges.iter().flat_map(|e| e.points.iter().copied()));
        points.fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
