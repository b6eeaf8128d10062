use super::*;
use crate::api::StaticDagSource;
use crate::error::{FetchError, StructureError};
use async_trait::async_trait;

struct FailingSource;

#[async_trait]
impl DagSource for FailingSource {
    async fn fetch_dag(&self) -> Result<Vec<NodeDescriptor>, FetchError> {
        Err(FetchError::Status {
            url: "http://localhost:8888/pachyderm/dag".to_string(),
            status: 500,
        })
    }
}

fn two_nodes() -> Vec<NodeDescriptor> {
    vec![NodeDescriptor::root("1"), NodeDescriptor::new("2", &["1"])]
}

#[test]
fn test_new_panel_is_pending_and_empty() {
    let panel = DagPanel::new(&RenderConfig::default());
    assert_eq!(panel.outcome(), PanelOutcome::Pending);
    assert_eq!(panel.node_count(), 0);
    assert!(!panel.is_closed());
}

#[test]
fn test_populate_draws_graph() {
    let panel = DagPanel::new(&RenderConfig::default());
    panel.populate(&two_nodes()).unwrap();
    assert_eq!(panel.node_count(), 2);
    assert_eq!(panel.edge_count(), 1);
    assert_eq!(panel.outcome(), PanelOutcome::Rendered { nodes: 2, edges: 1 });
}

#[test]
fn test_populate_after_close_is_render_target_error() {
    let panel = DagPanel::new(&RenderConfig::default());
    panel.close();
    let err = panel.populate(&two_nodes()).unwrap_err();
    assert!(matches!(err, DagError::RenderTarget(ref e) if e.panel == DAG_PANEL_ID));
    assert_eq!(panel.node_count(), 0);
}

#[test]
fn test_populate_rejects_dangling_parent() {
    let panel = DagPanel::new(&RenderConfig::default());
    let err = panel
        .populate(&[NodeDescriptor::new("A", &["Z"])])
        .unwrap_err();
    assert!(matches!(
        err,
        DagError::Structure(StructureError::DanglingParent { .. })
    ));
    assert_eq!(panel.node_count(), 0);
}

#[test]
fn test_handles_share_state() {
    let panel = DagPanel::new(&RenderConfig::default());
    let host_handle = panel.clone();
    panel.populate(&two_nodes()).unwrap();
    assert_eq!(host_handle.node_count(), 2);
    host_handle.close();
    assert!(panel.is_closed());
}

#[test]
fn test_pan_and_zoom_move_view() {
    let panel = DagPanel::new(&RenderConfig::default());
    panel.populate(&two_nodes()).unwrap();
    let before = panel.with_surface(|s| s.view);
    panel.pan_by(10.0, 0.0);
    panel.zoom_by(2.0, Point::new(0.0, 0.0));
    let after = panel.with_surface(|s| s.view);
    assert_eq!(after.k, before.k * 2.0);
    assert_eq!(after.x, (before.x + 10.0) * 2.0);
}

#[tokio::test]
async fn test_create_panel_renders_fetched_graph() {
    let source = StaticDagSource::new(two_nodes());
    let panel = create_dag_panel(&source, &RenderConfig::default()).await;
    assert_eq!(panel.outcome(), PanelOutcome::Rendered { nodes: 2, edges: 1 });
    assert!(panel.to_svg().contains("<circle"));
}

#[tokio::test]
async fn test_create_panel_survives_fetch_failure() {
    let panel = create_dag_panel(&FailingSource, &RenderConfig::default()).await;
    assert_eq!(panel.node_count(), 0);
    assert!(!panel.is_closed());
    match panel.outcome() {
        PanelOutcome::Failed {
            message,
            missing_server,
        } => {
            assert!(missing_server);
            assert!(message.contains("500"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_load_into_closed_panel() {
    let panel = DagPanel::new(&RenderConfig::default());
    panel.close();
    let err = load_into(&panel, &StaticDagSource::new(two_nodes()))
        .await
        .unwrap_err();
    assert!(err.suggests_missing_server());
}
