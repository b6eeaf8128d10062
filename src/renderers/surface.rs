//! The drawing surface a panel owns: an append-only list of SVG primitives
//! plus the pan/zoom transform of the group that holds them.

use crate::error::RenderTargetError;

use super::color::Rgb;
use super::view::ViewTransform;

/// Two-stop gradient stroked along one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub from: Rgb,
    pub to: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub source: String,
    pub target: String,
    pub d: String,
    pub gradient_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeMark {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowMark {
    pub target: String,
    /// Where the arrow tip group is translated to.
    pub x: f64,
    pub y: f64,
    /// Degrees, clockwise.
    pub angle: f64,
    pub d: String,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Gradient(Gradient),
    Edge(EdgePath),
    Node(NodeMark),
    Arrow(ArrowMark),
}

/// Append-only target for one panel's drawing.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    owner: String,
    attached: bool,
    pub width: f64,
    pub height: f64,
    /// `(min_x, min_y, width, height)` of the SVG viewBox.
    pub view_box: (f64, f64, f64, f64),
    pub view: ViewTransform,
    primitives: Vec<Primitive>,
}

impl DrawingSurface {
    pub fn new(owner: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            owner: owner.into(),
            attached: true,
            width,
            height,
            view_box: (0.0, 0.0, width, height),
            view: ViewTransform::identity(),
            primitives: Vec::new(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Tear the surface down; later appends fail.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Fail unless the surface can still be drawn on.
    pub fn ensure_attached(&self) -> Result<(), RenderTargetError> {
        if self.attached {
            Ok(())
        } else {
            Err(RenderTargetError {
                panel: self.owner.clone(),
            })
        }
    }

    pub fn append(&mut self, primitive: Primitive) -> Result<(), RenderTargetError> {
        self.ensure_attached()?;
        self.primitives.push(primitive);
        Ok(())
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn gradients(&self) -> impl Iterator<Item = &Gradient> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Gradient(g) => Some(g),
            _ => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgePath> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Edge(e) => Some(e),
            _ => None,
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeMark> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Node(n) => Some(n),
            _ => None,
        })
    }

    pub fn arrows(&self) -> impl Iterator<Item = &ArrowMark> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Arrow(a) => Some(a),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
