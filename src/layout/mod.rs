//! Layout engine: graph adapter plus the layered layout.

pub mod graph;
pub mod sugiyama;
pub mod types;

pub use graph::DagGraph;
pub use sugiyama::SugiyamaLayout;
pub use types::{LayoutEdge, LayoutNode, LayoutResult, LayoutSize, Point};

use crate::error::StructureError;
use crate::model::NodeDescriptor;

/// Adapt descriptors into a DAG and lay it out in one step.
///
/// Returns the validated graph alongside its layout, since rendering needs
/// the traversal order for coloring.
pub fn full_layout(
    descriptors: &[NodeDescriptor],
    size: LayoutSize,
) -> Result<(DagGraph, LayoutResult), StructureError> {
    let dag = DagGraph::from_descriptors(descriptors)?;
    let layout = SugiyamaLayout::layout(&dag, size);
    Ok((dag, layout))
}
