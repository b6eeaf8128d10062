use super::*;
use crate::layout::{DagGraph, LayoutSize, SugiyamaLayout};
use crate::model::NodeDescriptor;

fn draw(nodes: &[NodeDescriptor], config: &RenderConfig) -> (DrawingSurface, ColorAssignment) {
    let dag = DagGraph::from_descriptors(nodes).unwrap();
    let layout = SugiyamaLayout::layout(&dag, LayoutSize::new(config.width, config.height));
    let colors = ColorAssignment::from_traversal(&dag.traversal_order());
    let mut surface = DrawingSurface::new("test-panel", config.width, config.height);
    SvgRenderer::new(config)
        .render(&layout, &colors, &mut surface)
        .unwrap();
    (surface, colors)
}

fn two_nodes() -> Vec<NodeDescriptor> {
    vec![NodeDescriptor::root("1"), NodeDescriptor::new("2", &["1"])]
}

// ── Primitives ───────────────────────────────────────────────────────────

#[test]
fn test_single_node_draws_no_edges() {
    let (surface, _) = draw(&[NodeDescriptor::root("solo")], &RenderConfig::default());
    assert_eq!(surface.nodes().count(), 1);
    assert_eq!(surface.edges().count(), 0);
    assert_eq!(surface.arrows().count(), 0);
    assert_eq!(surface.gradients().count(), 0);
}

#[test]
fn test_two_nodes_one_edge() {
    let (surface, colors) = draw(&two_nodes(), &RenderConfig::default());
    assert_eq!(surface.nodes().count(), 2);

    let edges: Vec<_> = surface.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!((edges[0].source.as_str(), edges[0].target.as_str()), ("1", "2"));

    let grad = surface.gradients().next().unwrap();
    assert_eq!(grad.id, edges[0].gradient_id);
    assert_eq!(grad.from, colors.color("1"));
    assert_eq!(grad.to, colors.color("2"));
    assert_ne!(grad.from, grad.to);
}

#[test]
fn test_arrow_touches_target_boundary() {
    let config = RenderConfig::default();
    let (surface, colors) = draw(&two_nodes(), &config);
    let target = surface.nodes().find(|n| n.id == "2").unwrap();
    let arrow = surface.arrows().next().unwrap();

    let dist = ((arrow.x - target.x).powi(2) + (arrow.y - target.y).powi(2)).sqrt();
    assert!((dist - config.node_radius * ARROW_OFFSET).abs() < 1e-9);
    assert_eq!(arrow.fill, colors.color("2"));
    // Straight down onto the child: the triangle points down.
    assert!((arrow.angle - 180.0).abs() < 1e-9);
}

#[test]
fn test_node_radius_and_fill() {
    let (surface, colors) = draw(&two_nodes(), &RenderConfig::default());
    for n in surface.nodes() {
        assert_eq!(n.radius, 20.0);
        assert_eq!(n.fill, colors.color(&n.id));
    }
}

#[test]
fn test_detached_surface_is_render_target_error() {
    let dag = DagGraph::from_descriptors(&two_nodes()).unwrap();
    let layout = SugiyamaLayout::layout(&dag, LayoutSize::new(100.0, 100.0));
    let colors = ColorAssignment::from_traversal(&dag.traversal_order());
    let mut surface = DrawingSurface::new("closed", 100.0, 100.0);
    surface.detach();
    let err = SvgRenderer::default()
        .render(&layout, &colors, &mut surface)
        .unwrap_err();
    assert_eq!(err.panel, "closed");
    assert!(surface.is_empty());
}

// ── Arrow geometry ───────────────────────────────────────────────────────

#[test]
fn test_arrow_placement_uses_last_segment() {
    let at = arrow_placement(
        &[
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ],
        20.0,
    )
    .unwrap();
    assert!((at.x - 100.0).abs() < 1e-9);
    assert!((at.y - 77.0).abs() < 1e-9);
}

#[test]
fn test_arrow_placement_degenerate() {
    assert!(arrow_placement(&[Point::new(1.0, 1.0)], 20.0).is_none());
    assert!(arrow_placement(&[Point::new(1.0, 1.0), Point::new(1.0, 1.0)], 20.0).is_none());
}

#[test]
fn test_triangle_path_area() {
    // Area 80 (radius 20): the tip sits 2y above center.
    let d = triangle_path(80.0);
    assert!(d.starts_with("M0,-"));
    assert!(d.ends_with('Z'));
    assert_eq!(d.matches('L').count(), 2);
}

// ── Gradient ids ─────────────────────────────────────────────────────────

#[test]
fn test_gradient_ids_are_sanitized_and_unique() {
    let mut taken = HashSet::new();
    let a = gradient_id("my repo", "out/put", &mut taken);
    let b = gradient_id("my_repo", "out_put", &mut taken);
    assert_eq!(a, "grad-my_repo-out_put");
    assert_eq!(b, "grad-my_repo-out_put-2");
}

// ── View policy ──────────────────────────────────────────────────────────

#[test]
fn test_auto_fit_centers_drawing() {
    let config = RenderConfig::default();
    let (surface, _) = draw(&two_nodes(), &config);
    assert_eq!(surface.view_box, (0.0, 0.0, 1300.0, 700.0));
    let n1 = surface.nodes().find(|n| n.id == "1").unwrap();
    let n2 = surface.nodes().find(|n| n.id == "2").unwrap();
    let mid = surface
        .view
        .apply(Point::new((n1.x + n2.x) / 2.0, (n1.y + n2.y) / 2.0));
    assert!((mid.x - 650.0).abs() < 1e-9);
    assert!((mid.y - 350.0).abs() < 1e-9);
}

#[test]
fn test_identity_policy_pads_view_box() {
    let config = RenderConfig {
        view_policy: ViewPolicy::Identity,
        ..RenderConfig::default()
    };
    let (surface, _) = draw(&two_nodes(), &config);
    assert_eq!(surface.view, ViewTransform::identity());
    assert_eq!(surface.view_box, (-20.0, -20.0, 1340.0, 740.0));
}

// ── Serialization ────────────────────────────────────────────────────────

#[test]
fn test_svg_document_structure() {
    let (surface, colors) = draw(&two_nodes(), &RenderConfig::default());
    let svg = to_svg(&surface, false);
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<circle").count(), 2);
    assert_eq!(svg.matches("<linearGradient").count(), 1);
    assert!(svg.contains(&format!("stop-color=\"{}\"", colors.color("1"))));
    assert!(svg.contains("stroke=\"url(#grad-1-2)\""));
    assert!(svg.contains(&format!("id=\"{VIEW_GROUP_ID}\"")));
    assert!(!svg.contains("<script>"));
}

#[test]
fn test_svg_escapes_labels() {
    let (surface, _) = draw(&[NodeDescriptor::root("a<b&c")], &RenderConfig::default());
    let svg = to_svg(&surface, false);
    assert!(svg.contains(">a&lt;b&amp;c</text>"));
}

#[test]
fn test_interactive_svg_carries_initial_transform() {
    let (surface, _) = draw(&two_nodes(), &RenderConfig::default());
    let svg = to_svg(&surface, true);
    assert!(svg.contains("<script><![CDATA["));
    assert!(svg.contains(&format!("var k = {}", num(surface.view.k))));
    assert!(!svg.contains("__K__"));
}

#[test]
fn test_empty_surface_is_valid_svg() {
    let surface = DrawingSurface::new("empty", 300.0, 200.0);
    let svg = to_svg(&surface, false);
    assert!(svg.contains("width=\"300\" height=\"200\""));
    assert_eq!(svg.matches("<circle").count(), 0);
}
