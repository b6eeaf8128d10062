//! Fetcher and panel factory against a mock extension server.

use pachyderm_dag::api::{DagSource, HttpDagSource};
use pachyderm_dag::config::{ApiConfig, RenderConfig};
use pachyderm_dag::error::FetchError;
use pachyderm_dag::host::{PanelOutcome, create_dag_panel};
use pachyderm_dag::model::NodeDescriptor;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpDagSource {
    let api = ApiConfig::parse(&format!("{}/pachyderm", server.uri())).unwrap();
    HttpDagSource::new(api)
}

async fn serve(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pachyderm/dag"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "application/json")
                .set_body_string(body),
        )
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_decodes_node_list() {
    let server = serve(
        200,
        r#"[{"id":"images","parentIds":[]},{"id":"edges","parentIds":["images"]}]"#,
    )
    .await;

    let nodes = source_for(&server).fetch_dag().await.unwrap();
    assert_eq!(
        nodes,
        vec![
            NodeDescriptor::root("images"),
            NodeDescriptor::new("edges", &["images"]),
        ]
    );
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let server = serve(500, "boom").await;
    let err = source_for(&server).fetch_dag().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_fetch_bad_body() {
    let server = serve(200, r#"{"not":"a list"}"#).await;
    let err = source_for(&server).fetch_dag().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_fetch_unreachable_server() {
    // Bind then drop a server so the port is very likely closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let api = ApiConfig::parse(&uri).unwrap();
    let err = HttpDagSource::new(api).fetch_dag().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn test_panel_from_server_error_is_empty() {
    let server = serve(500, "").await;
    let panel = create_dag_panel(&source_for(&server), &RenderConfig::default()).await;

    assert_eq!(panel.node_count(), 0);
    assert!(!panel.is_closed());
    assert!(matches!(
        panel.outcome(),
        PanelOutcome::Failed {
            missing_server: true,
            ..
        }
    ));
    assert!(panel.to_svg().contains("<svg"));
}

#[tokio::test]
async fn test_panel_from_server_two_nodes() {
    let server = serve(
        200,
        r#"[{"id":"1","parentIds":[]},{"id":"2","parentIds":["1"]}]"#,
    )
    .await;
    let config = RenderConfig::default();
    let panel = create_dag_panel(&source_for(&server), &config).await;

    assert_eq!(panel.outcome(), PanelOutcome::Rendered { nodes: 2, edges: 1 });
    panel.with_surface(|surface| {
        let target = surface.nodes().find(|n| n.id == "2").unwrap();
        let arrow = surface.arrows().next().unwrap();
        let dist = ((arrow.x - target.x).powi(2) + (arrow.y - target.y).powi(2)).sqrt();
        assert!((dist - config.node_radius * 1.15).abs() < 1e-9);

        let gradient = surface.gradients().next().unwrap();
        let source = surface.nodes().find(|n| n.id == "1").unwrap();
        assert_eq!(gradient.from, source.fill);
        assert_eq!(gradient.to, target.fill);
    });
}
