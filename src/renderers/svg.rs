//! SVG renderer: draws a laid-out DAG onto a [`DrawingSurface`] and
//! serializes the surface.
//!
//! Paint order: edges, then nodes, then arrowheads on top. Every primitive
//! sits inside one group carrying the pan/zoom transform.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{RenderConfig, ViewPolicy};
use crate::error::RenderTargetError;
use crate::layout::{LayoutResult, Point};

use super::color::ColorAssignment;
use super::curve::catmull_rom_path;
use super::surface::{ArrowMark, DrawingSurface, EdgePath, Gradient, NodeMark, Primitive};
use super::view::ViewTransform;
use super::{Renderer, num};

// ── Constants ────────────────────────────────────────────────────────────────

const EDGE_STROKE_WIDTH: f64 = 3.0;
const ARROW_STROKE_WIDTH: f64 = 1.5;
/// Arrow tip distance from the target center, in node radii.
pub const ARROW_OFFSET: f64 = 1.15;
const FONT_FAMILY: &str = "sans-serif";
/// id of the group carrying the pan/zoom transform.
pub const VIEW_GROUP_ID: &str = "pachyderm-dag-view";

static UNSAFE_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex"));

// Drag to pan, wheel to zoom around the cursor. Placeholders are replaced
// with the initial transform.
const PAN_ZOOM_SCRIPT: &str = r#"(function () {
  var g = document.getElementById("__GROUP__");
  if (!g) { return; }
  var svg = g.ownerSVGElement;
  var k = __K__, x = __X__, y = __Y__, drag = null;
  function apply() {
    g.setAttribute("transform", "translate(" + x + "," + y + ") scale(" + k + ")");
  }
  svg.addEventListener("wheel", function (e) {
    e.preventDefault();
    var r = svg.getBoundingClientRect();
    var px = e.clientX - r.left, py = e.clientY - r.top;
    var f = Math.pow(2, -e.deltaY * 0.002);
    x = px - (px - x) * f; y = py - (py - y) * f; k *= f;
    apply();
  }, { passive: false });
  svg.addEventListener("mousedown", function (e) { drag = [e.clientX - x, e.clientY - y]; });
  window.addEventListener("mousemove", function (e) {
    if (drag) { x = e.clientX - drag[0]; y = e.clientY - drag[1]; apply(); }
  });
  window.addEventListener("mouseup", function () { drag = null; });
})();"#;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Gradient element id for an edge, unique within `taken`.
fn gradient_id(source: &str, target: &str, taken: &mut HashSet<String>) -> String {
    let base = UNSAFE_ID_CHARS
        .replace_all(&format!("{source}-{target}"), "_")
        .into_owned();
    let base = format!("grad-{base}");
    let mut id = base.clone();
    let mut n = 1;
    while !taken.insert(id.clone()) {
        n += 1;
        id = format!("{base}-{n}");
    }
    id
}

/// Path data of a triangle symbol with the given area, tip pointing up.
pub fn triangle_path(area: f64) -> String {
    let sqrt3 = 3f64.sqrt();
    let y = -(area / (sqrt3 * 3.0)).sqrt();
    format!(
        "M0,{}L{},{}L{},{}Z",
        num(y * 2.0),
        num(-sqrt3 * y),
        num(-y),
        num(sqrt3 * y),
        num(-y)
    )
}

/// Where an arrowhead goes on an edge, and how it is rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowPlacement {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// Place the arrowhead on the last routing segment, `radius × 1.15` away
/// from the final point, pointing along that segment.
///
/// Exact only when the last segment of the drawn curve is straight; on a
/// bent edge the arrow sits slightly off the curve. Returns `None` when the
/// last segment has no length.
pub fn arrow_placement(points: &[Point], radius: f64) -> Option<ArrowPlacement> {
    let [.., start, end] = points else {
        return None;
    };
    let dx = start.x - end.x;
    let dy = start.y - end.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let scale = radius * ARROW_OFFSET / len;
    Some(ArrowPlacement {
        x: end.x + dx * scale,
        y: end.y + dy * scale,
        angle: (-dy).atan2(-dx).to_degrees() + 90.0,
    })
}

// ── Renderer ─────────────────────────────────────────────────────────────────

/// Draws nodes as labelled circles and edges as gradient curves.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub node_radius: f64,
    pub view_policy: ViewPolicy,
}

impl SvgRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            node_radius: config.node_radius,
            view_policy: config.view_policy,
        }
    }

    fn initial_view(&self, layout: &LayoutResult, surface: &mut DrawingSurface) {
        let r = self.node_radius;
        match self.view_policy {
            ViewPolicy::AutoFit => {
                surface.view_box = (0.0, 0.0, surface.width, surface.height);
                surface.view = match layout.bounds() {
                    Some((lo, hi)) => {
                        ViewTransform::auto_fit(lo, hi, r, surface.width, surface.height)
                    }
                    None => ViewTransform::identity(),
                };
            }
            ViewPolicy::Identity => {
                surface.view_box = (-r, -r, surface.width + 2.0 * r, surface.height + 2.0 * r);
                surface.view = ViewTransform::identity();
            }
        }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Renderer for SvgRenderer {
    fn render(
        &self,
        layout: &LayoutResult,
        colors: &ColorAssignment,
        surface: &mut DrawingSurface,
    ) -> Result<(), RenderTargetError> {
        surface.ensure_attached()?;
        self.initial_view(layout, surface);

        let mut taken = HashSet::new();
        for edge in &layout.edges {
            let (Some(src), Some(tgt)) = (layout.node(&edge.source), layout.node(&edge.target))
            else {
                continue;
            };
            let gradient_id = gradient_id(&edge.source, &edge.target, &mut taken);
            surface.append(Primitive::Gradient(Gradient {
                id: gradient_id.clone(),
                x1: src.x,
                y1: src.y,
                x2: tgt.x,
                y2: tgt.y,
                from: colors.color(&edge.source),
                to: colors.color(&edge.target),
            }))?;
            surface.append(Primitive::Edge(EdgePath {
                source: edge.source.clone(),
                target: edge.target.clone(),
                d: catmull_rom_path(&edge.points),
                gradient_id,
            }))?;
        }

        for node in &layout.nodes {
            surface.append(Primitive::Node(NodeMark {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                radius: self.node_radius,
                fill: colors.color(&node.id),
            }))?;
        }

        let arrow = triangle_path(self.node_radius * self.node_radius / 5.0);
        for edge in &layout.edges {
            let Some(at) = arrow_placement(&edge.points, self.node_radius) else {
                continue;
            };
            surface.append(Primitive::Arrow(ArrowMark {
                target: edge.target.clone(),
                x: at.x,
                y: at.y,
                angle: at.angle,
                d: arrow.clone(),
                fill: colors.color(&edge.target),
            }))?;
        }

        tracing::debug!(
            nodes = layout.nodes.len(),
            edges = layout.edges.len(),
            "drew pipeline graph"
        );
        Ok(())
    }
}

// ── Serialization ────────────────────────────────────────────────────────────

/// Serialize a surface to a standalone SVG document.
///
/// With `interactive`, a small script wires drag-to-pan and wheel zoom to
/// the view group, starting from the surface's current transform.
pub fn to_svg(surface: &DrawingSurface, interactive: bool) -> String {
    let (vx, vy, vw, vh) = surface.view_box;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}" class="dag-container">"#,
        num(surface.width),
        num(surface.height),
        num(vx),
        num(vy),
        num(vw),
        num(vh)
    );

    out.push_str("<defs>\n");
    for g in surface.gradients() {
        let _ = writeln!(
            out,
            r#"  <linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
            escape(&g.id),
            num(g.x1),
            num(g.y1),
            num(g.x2),
            num(g.y2)
        );
        let _ = writeln!(out, r#"    <stop offset="0%" stop-color="{}"/>"#, g.from);
        let _ = writeln!(out, r#"    <stop offset="100%" stop-color="{}"/>"#, g.to);
        out.push_str("  </linearGradient>\n");
    }
    out.push_str("</defs>\n");

    let _ = writeln!(
        out,
        r#"<g id="{VIEW_GROUP_ID}" class="dag" transform="{}">"#,
        surface.view.to_attr()
    );

    out.push_str("<g class=\"edges\">\n");
    for e in surface.edges() {
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="none" stroke-width="{}" stroke="url(#{})"/>"#,
            e.d,
            num(EDGE_STROKE_WIDTH),
            escape(&e.gradient_id)
        );
    }
    out.push_str("</g>\n");

    out.push_str("<g class=\"nodes\">\n");
    for n in surface.nodes() {
        let _ = writeln!(
            out,
            r#"  <g transform="translate({}, {})"><circle r="{}" fill="{}"/><text font-weight="bold" font-family="{FONT_FAMILY}" text-anchor="middle" alignment-baseline="middle" fill="white">{}</text></g>"#,
            num(n.x),
            num(n.y),
            num(n.radius),
            n.fill,
            escape(&n.id)
        );
    }
    out.push_str("</g>\n");

    out.push_str("<g class=\"arrows\">\n");
    for a in surface.arrows() {
        let _ = writeln!(
            out,
            r#"  <path d="{}" transform="translate({}, {}) rotate({})" fill="{}" stroke="white" stroke-width="{}"/>"#,
            a.d,
            num(a.x),
            num(a.y),
            num(a.angle),
            a.fill,
            num(ARROW_STROKE_WIDTH)
        );
    }
    out.push_str("</g>\n");
    out.push_str("</g>\n");

    if interactive {
        let script = PAN_ZOOM_SCRIPT
            .replace("__GROUP__", VIEW_GROUP_ID)
            .replace("__K__", &num(surface.view.k))
            .replace("__X__", &num(surface.view.x))
            .replace("__Y__", &num(surface.view.y));
        let _ = writeln!(out, "<script><![CDATA[\n{script}\n]]></script>");
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
#[path = "../../tests/rust/test_renderers_svg.rs"]
mod tests;
