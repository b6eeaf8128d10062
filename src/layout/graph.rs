//! DagGraph: adapts fetched node descriptors into a petgraph DiGraph.
//!
//! Edges run parent → child. Construction fails loudly on anything the
//! layered layout cannot consume: duplicate ids, parents that do not exist,
//! and cycles.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::StructureError;
use crate::model::NodeDescriptor;

/// Node data stored in the petgraph DiGraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: String,
}

/// A validated pipeline DAG.
///
/// Node indices follow input order, which makes every query below
/// deterministic for a given descriptor list.
#[derive(Debug, Clone)]
pub struct DagGraph {
    pub digraph: DiGraph<NodeData, ()>,
    /// Maps node id → petgraph NodeIndex.
    pub node_index: HashMap<String, NodeIndex>,
}

impl DagGraph {
    /// Build and validate a DAG from the descriptors returned by the server.
    pub fn from_descriptors(descriptors: &[NodeDescriptor]) -> Result<Self, StructureError> {
        let mut digraph: DiGraph<NodeData, ()> = DiGraph::new();
        let mut node_index: HashMap<String, NodeIndex> = HashMap::new();

        for d in descriptors {
            if node_index.contains_key(&d.id) {
                return Err(StructureError::DuplicateNode { id: d.id.clone() });
            }
            let idx = digraph.add_node(NodeData { id: d.id.clone() });
            node_index.insert(d.id.clone(), idx);
        }

        for d in descriptors {
            let child = node_index[&d.id];
            let mut seen: Vec<&str> = Vec::with_capacity(d.parent_ids.len());
            for parent in &d.parent_ids {
                if seen.contains(&parent.as_str()) {
                    tracing::debug!(node = %d.id, parent = %parent, "ignoring repeated parent");
                    continue;
                }
                seen.push(parent);
                if *parent == d.id {
                    return Err(StructureError::Cycle { node: d.id.clone() });
                }
                let Some(&from) = node_index.get(parent) else {
                    return Err(StructureError::DanglingParent {
                        node: d.id.clone(),
                        parent: parent.clone(),
                    });
                };
                digraph.add_edge(from, child, ());
            }
        }

        if let Err(cycle) = toposort(&digraph, None) {
            return Err(StructureError::Cycle {
                node: digraph[cycle.node_id()].id.clone(),
            });
        }

        Ok(Self {
            digraph,
            node_index,
        })
    }

    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Node ids in input order.
    pub fn ids(&self) -> Vec<String> {
        self.digraph
            .node_indices()
            .map(|idx| self.digraph[idx].id.clone())
            .collect()
    }

    /// Parent ids of `id`, in the order the server listed them.
    pub fn parents(&self, id: &str) -> Vec<String> {
        self.neighbors_in_order(id, Direction::Incoming)
    }

    /// Child ids of `id`, in input order.
    pub fn children(&self, id: &str) -> Vec<String> {
        self.neighbors_in_order(id, Direction::Outgoing)
    }

    /// Every (parent, child) pair, grouped by child in input order.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.digraph
            .edge_indices()
            .filter_map(|e| self.digraph.edge_endpoints(e))
            .map(|(a, b)| (self.digraph[a].id.clone(), self.digraph[b].id.clone()))
            .collect()
    }

    /// Topological order, ties broken by input order (Kahn's algorithm).
    ///
    /// This is the traversal the color palette is indexed by.
    pub fn traversal_order(&self) -> Vec<String> {
        let mut in_deg: Vec<usize> = self
            .digraph
            .node_indices()
            .map(|idx| self.digraph.edges_directed(idx, Direction::Incoming).count())
            .collect();
        let mut ready: BTreeSet<NodeIndex> = self
            .digraph
            .node_indices()
            .filter(|idx| in_deg[idx.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.node_count());
        while let Some(idx) = ready.pop_first() {
            order.push(self.digraph[idx].id.clone());
            for succ in self.digraph.neighbors_directed(idx, Direction::Outgoing) {
                in_deg[succ.index()] -= 1;
                if in_deg[succ.index()] == 0 {
                    ready.insert(succ);
                }
            }
        }
        order
    }

    fn neighbors_in_order(&self, id: &str, dir: Direction) -> Vec<String> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest-first; edge indices restore
        // insertion order.
        let mut edges: Vec<EdgeIndex> = self
            .digraph
            .edges_directed(idx, dir)
            .map(|e| e.id())
            .collect();
        edges.sort();
        edges
            .into_iter()
            .filter_map(|e| self.digraph.edge_endpoints(e))
            .map(|(from, to)| {
                let other = if dir == Direction::Incoming { from } else { to };
                self.digraph[other].id.clone()
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_graph.rs"]
mod tests;
