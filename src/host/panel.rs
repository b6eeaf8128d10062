//! The DAG panel and the factory that populates it.
//!
//! A panel is a cheap, clonable handle: the host keeps one in its layout
//! while the fetch → adapt → layout → render chain holds another. Closing
//! the panel detaches its surface, so a render that lands afterwards fails
//! with [`RenderTargetError`](crate::error::RenderTargetError) instead of
//! drawing into nothing.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::DagSource;
use crate::config::RenderConfig;
use crate::error::{DagError, MISSING_SERVER_HINT};
use crate::layout::{LayoutSize, Point, full_layout};
use crate::model::NodeDescriptor;
use crate::renderers::svg::to_svg;
use crate::renderers::{ColorAssignment, DrawingSurface, Renderer, SvgRenderer};

pub const DAG_PANEL_ID: &str = "pachyderm-dag-widget";
pub const DAG_PANEL_TITLE: &str = "Pachyderm DAG";

/// What happened to the panel's single render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    /// Still waiting on the fetch.
    Pending,
    Rendered { nodes: usize, edges: usize },
    /// The attempt failed; the panel stays open and empty.
    Failed {
        message: String,
        missing_server: bool,
    },
}

struct PanelState {
    surface: DrawingSurface,
    outcome: PanelOutcome,
}

#[derive(Clone)]
pub struct DagPanel {
    config: RenderConfig,
    state: Arc<Mutex<PanelState>>,
}

impl DagPanel {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            config: config.clone(),
            state: Arc::new(Mutex::new(PanelState {
                surface: DrawingSurface::new(DAG_PANEL_ID, config.width, config.height),
                outcome: PanelOutcome::Pending,
            })),
        }
    }

    pub fn id(&self) -> &'static str {
        DAG_PANEL_ID
    }

    pub fn title(&self) -> &'static str {
        DAG_PANEL_TITLE
    }

    pub fn closable(&self) -> bool {
        true
    }

    /// Close the panel. Its surface is torn down; a fetch still in flight
    /// is not cancelled.
    pub fn close(&self) {
        self.state.lock().surface.detach();
        tracing::debug!(panel = DAG_PANEL_ID, "panel closed");
    }

    pub fn is_closed(&self) -> bool {
        !self.state.lock().surface.is_attached()
    }

    pub fn outcome(&self) -> PanelOutcome {
        self.state.lock().outcome.clone()
    }

    /// Number of node circles drawn so far.
    pub fn node_count(&self) -> usize {
        self.state.lock().surface.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.state.lock().surface.edges().count()
    }

    /// Run `f` against the drawing surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&DrawingSurface) -> R) -> R {
        f(&self.state.lock().surface)
    }

    pub fn pan_by(&self, dx: f64, dy: f64) {
        self.state.lock().surface.view.pan_by(dx, dy);
    }

    pub fn zoom_by(&self, factor: f64, anchor: Point) {
        self.state.lock().surface.view.zoom_by(factor, anchor);
    }

    /// Serialize the panel's current drawing.
    pub fn to_svg(&self) -> String {
        to_svg(&self.state.lock().surface, self.config.interactive)
    }

    /// Adapt, lay out, and draw `descriptors` onto this panel.
    pub fn populate(&self, descriptors: &[NodeDescriptor]) -> Result<(), DagError> {
        let mut state = self.state.lock();
        state.surface.ensure_attached()?;

        let size = LayoutSize::new(self.config.width, self.config.height);
        let (dag, layout) = full_layout(descriptors, size)?;
        let colors = ColorAssignment::from_traversal(&dag.traversal_order());
        SvgRenderer::new(&self.config).render(&layout, &colors, &mut state.surface)?;

        state.outcome = PanelOutcome::Rendered {
            nodes: layout.nodes.len(),
            edges: layout.edges.len(),
        };
        Ok(())
    }

    fn fail(&self, err: &DagError) {
        self.state.lock().outcome = PanelOutcome::Failed {
            message: err.to_string(),
            missing_server: err.suggests_missing_server(),
        };
    }
}

impl std::fmt::Debug for DagPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DagPanel")
            .field("id", &DAG_PANEL_ID)
            .field("outcome", &self.outcome())
            .finish()
    }
}

/// Fetch the node list from `source` and draw it onto `panel`.
pub async fn load_into(panel: &DagPanel, source: &dyn DagSource) -> Result<(), DagError> {
    let nodes = source.fetch_dag().await?;
    panel.populate(&nodes)
}

/// Build a DAG panel: fetch, adapt, lay out, render.
///
/// Never fails. Any error is logged and recorded in the panel's outcome,
/// and the panel is returned open and empty.
pub async fn create_dag_panel(source: &dyn DagSource, config: &RenderConfig) -> DagPanel {
    let panel = DagPanel::new(config);
    match load_into(&panel, source).await {
        Ok(()) => {
            tracing::debug!(
                nodes = panel.node_count(),
                edges = panel.edge_count(),
                "pipeline graph rendered"
            );
        }
        Err(e) => {
            if e.suggests_missing_server() {
                tracing::error!(error = %e, "{MISSING_SERVER_HINT}");
            } else {
                tracing::error!(error = %e, "pipeline graph is not a valid DAG");
            }
            panel.fail(&e);
        }
    }
    panel
}

#[cfg(test)]
#[path = "../../tests/rust/test_host_panel.rs"]
mod tests;
