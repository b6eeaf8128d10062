//! pachyderm-dag — fetch a Pachyderm pipeline graph and draw it as a
//! layered SVG diagram.
//!
//! The chain is fetch → adapt → layout → render:
//! [`api::DagSource`] produces [`model::NodeDescriptor`]s,
//! [`layout::DagGraph`] validates them into a DAG,
//! [`layout::SugiyamaLayout`] positions it, and
//! [`renderers::SvgRenderer`] draws onto a panel's surface. [`host`] wires
//! the chain to the `pachyderm:dag-viewer` and `pachyderm:shell` commands.

pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod renderers;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{ApiConfig, RenderConfig, ViewPolicy};
pub use error::DagError;
pub use host::{DagPanel, PachydermExtension, create_dag_panel};
pub use model::NodeDescriptor;

/// Lay out and draw a node list, returning the SVG document.
///
/// Unlike [`create_dag_panel`], a malformed graph is returned as an error
/// rather than an empty drawing.
pub fn render_dag(nodes: &[NodeDescriptor], config: &RenderConfig) -> Result<String, DagError> {
    let panel = DagPanel::new(config);
    panel.populate(nodes)?;
    Ok(panel.to_svg())
}

/// [`render_dag`] on the JSON body the `dag` endpoint returns.
pub fn render_dag_json(json: &str, config: &RenderConfig) -> Result<String, DagError> {
    let nodes = model::descriptors_from_json(json)?;
    render_dag(&nodes, config)
}
