//! Sugiyama layered graph layout algorithm.
//!
//! Phases:
//!   1. Layer assignment (longest path from the roots)
//!   2. Dummy node insertion for edges spanning several layers
//!   3. Crossing minimisation (barycenter sweeps)
//!   4. Coordinate assignment (layers centered, scaled to the target size)
//!   5. Edge routing points
//!
//! The input is already acyclic (see [`DagGraph::from_descriptors`]), so
//! there is no cycle-removal phase. Nothing here iterates a hash map in a way
//! that reaches the output: the same graph and size always produce the same
//! layout.

use std::collections::HashMap;

use super::graph::DagGraph;
use super::types::{DUMMY_PREFIX, LayoutEdge, LayoutNode, LayoutResult, LayoutSize, Point};

/// Upper bound on down/up sweep pairs during crossing minimisation.
pub const MAX_DECROSS_PASSES: usize = 24;

// ─── Layer Assignment ────────────────────────────────────────────────────────

pub struct LayerAssignment {
    pub layers: HashMap<String, usize>,
    pub layer_count: usize,
}

impl LayerAssignment {
    /// Every node goes one layer below its deepest parent; roots sit on 0.
    pub fn longest_path(dag: &DagGraph) -> Self {
        let mut layers: HashMap<String, usize> = HashMap::new();
        for id in dag.traversal_order() {
            let layer = dag
                .parents(&id)
                .iter()
                .filter_map(|p| layers.get(p))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            layers.insert(id, layer);
        }

        let layer_count = layers.values().copied().max().map_or(0, |m| m + 1);
        Self {
            layers,
            layer_count,
        }
    }
}

// ─── Dummy Node Insertion ────────────────────────────────────────────────────

/// An original edge and the dummy nodes standing in for it on skipped layers.
pub struct DummyChain {
    pub source: String,
    pub target: String,
    pub dummy_ids: Vec<String>,
}

/// The layered graph with every edge spanning exactly one layer.
pub struct AugmentedGraph {
    /// Real nodes in input order, then dummies in edge order.
    pub nodes: Vec<String>,
    pub layers: HashMap<String, usize>,
    pub layer_count: usize,
    successors: HashMap<String, Vec<String>>,
    predecessors: HashMap<String, Vec<String>>,
    /// One chain per original edge, in edge order.
    pub chains: Vec<DummyChain>,
}

impl AugmentedGraph {
    fn add_segment(&mut self, src: &str, tgt: &str) {
        self.successors
            .entry(src.to_string())
            .or_default()
            .push(tgt.to_string());
        self.predecessors
            .entry(tgt.to_string())
            .or_default()
            .push(src.to_string());
    }

    fn successors_of(&self, id: &str) -> &[String] {
        self.successors.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn predecessors_of(&self, id: &str) -> &[String] {
        self.predecessors
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_dummy(id: &str) -> bool {
        id.starts_with(DUMMY_PREFIX)
    }
}

pub fn insert_dummy_nodes(dag: &DagGraph, la: &LayerAssignment) -> AugmentedGraph {
    let mut aug = AugmentedGraph {
        nodes: dag.ids(),
        layers: la.layers.clone(),
        layer_count: la.layer_count,
        successors: HashMap::new(),
        predecessors: HashMap::new(),
        chains: Vec::new(),
    };

    for (edge_no, (src, tgt)) in dag.edges().into_iter().enumerate() {
        let src_layer = la.layers.get(&src).copied().unwrap_or(0);
        let tgt_layer = la.layers.get(&tgt).copied().unwrap_or(src_layer + 1);

        let mut dummy_ids = Vec::new();
        let mut chain_prev = src.clone();
        for layer in (src_layer + 1)..tgt_layer {
            let dummy_id = format!("{}{}_{}", DUMMY_PREFIX, edge_no, layer - src_layer - 1);
            aug.nodes.push(dummy_id.clone());
            aug.layers.insert(dummy_id.clone(), layer);
            aug.add_segment(&chain_prev, &dummy_id);
            dummy_ids.push(dummy_id.clone());
            chain_prev = dummy_id;
        }
        aug.add_segment(&chain_prev, &tgt);

        aug.chains.push(DummyChain {
            source: src,
            target: tgt,
            dummy_ids,
        });
    }

    aug
}

// ─── Crossing Minimization ───────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Sweep {
    Down,
    Up,
}

fn barycenter(
    node_id: &str,
    aug: &AugmentedGraph,
    neighbor_pos: &HashMap<&str, usize>,
    sweep: Sweep,
) -> Option<f64> {
    let neighbors = match sweep {
        Sweep::Down => aug.predecessors_of(node_id),
        Sweep::Up => aug.successors_of(node_id),
    };
    let positions: Vec<f64> = neighbors
        .iter()
        .filter_map(|nb| neighbor_pos.get(nb.as_str()).map(|&p| p as f64))
        .collect();
    if positions.is_empty() {
        None
    } else {
        Some(positions.iter().sum::<f64>() / positions.len() as f64)
    }
}

fn count_crossings(ordering: &[Vec<String>], aug: &AugmentedGraph) -> usize {
    let mut total = 0usize;
    for l_idx in 0..ordering.len().saturating_sub(1) {
        let tgt_pos: HashMap<&str, usize> = ordering[l_idx + 1]
            .iter()
            .enumerate()
            .map(|(i, nid)| (nid.as_str(), i))
            .collect();
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for (sp, src_id) in ordering[l_idx].iter().enumerate() {
            for nb in aug.successors_of(src_id) {
                if let Some(&tp) = tgt_pos.get(nb.as_str()) {
                    edges.push((sp, tp));
                }
            }
        }
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                let (ei0, ei1) = edges[i];
                let (ej0, ej1) = edges[j];
                if (ei0 < ej0 && ei1 > ej1) || (ei0 > ej0 && ei1 < ej1) {
                    total += 1;
                }
            }
        }
    }
    total
}

/// Reorder `layer` by the barycenter of each node's neighbors in `fixed`.
/// Nodes with no neighbor there keep their current index as their key.
fn sort_layer(layer: &mut [String], fixed: &[String], aug: &AugmentedGraph, sweep: Sweep) {
    let pos: HashMap<&str, usize> = fixed
        .iter()
        .enumerate()
        .map(|(i, nid)| (nid.as_str(), i))
        .collect();
    let mut keyed: Vec<(f64, String)> = layer
        .iter()
        .enumerate()
        .map(|(i, nid)| {
            let key = barycenter(nid, aug, &pos, sweep).unwrap_or(i as f64);
            (key, nid.clone())
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    for (slot, (_, nid)) in layer.iter_mut().zip(keyed) {
        *slot = nid;
    }
}

pub fn minimise_crossings(aug: &AugmentedGraph) -> Vec<Vec<String>> {
    let layer_count = aug.layer_count;
    let mut ordering: Vec<Vec<String>> = vec![Vec::new(); layer_count];
    for node_id in &aug.nodes {
        let layer = aug.layers.get(node_id).copied().unwrap_or(0);
        if layer < ordering.len() {
            ordering[layer].push(node_id.clone());
        }
    }

    let mut best = ordering.clone();
    let mut best_crossings = count_crossings(&ordering, aug);

    for _pass in 0..MAX_DECROSS_PASSES {
        if best_crossings == 0 {
            break;
        }

        for layer_idx in 1..layer_count {
            let (above, rest) = ordering.split_at_mut(layer_idx);
            sort_layer(&mut rest[0], &above[layer_idx - 1], aug, Sweep::Down);
        }
        for layer_idx in (0..layer_count.saturating_sub(1)).rev() {
            let (upto, below) = ordering.split_at_mut(layer_idx + 1);
            sort_layer(&mut upto[layer_idx], &below[0], aug, Sweep::Up);
        }

        let crossings = count_crossings(&ordering, aug);
        if crossings >= best_crossings {
            break;
        }
        best_crossings = crossings;
        best = ordering.clone();
    }

    tracing::debug!(crossings = best_crossings, "crossing minimisation done");
    best
}

// ─── Coordinate Assignment ───────────────────────────────────────────────────

/// Center every layer horizontally across `size.width` and spread layers
/// evenly down `size.height`. A single layer sits on the vertical middle.
pub fn assign_coordinates(ordering: &[Vec<String>], size: LayoutSize) -> HashMap<String, Point> {
    let max_width = ordering.iter().map(Vec::len).max().unwrap_or(0).max(1) as f64;
    let layer_count = ordering.len();

    let mut positions = HashMap::new();
    for (layer_idx, layer_nodes) in ordering.iter().enumerate() {
        let y = if layer_count <= 1 {
            size.height / 2.0
        } else {
            layer_idx as f64 / (layer_count - 1) as f64 * size.height
        };
        let offset = (max_width - layer_nodes.len() as f64) / 2.0;
        for (order, node_id) in layer_nodes.iter().enumerate() {
            let x = (offset + order as f64 + 0.5) / max_width * size.width;
            positions.insert(node_id.clone(), Point::new(x, y));
        }
    }
    positions
}

// ─── SugiyamaLayout Engine ───────────────────────────────────────────────────

/// Sugiyama layered layout engine.
pub struct SugiyamaLayout;

impl SugiyamaLayout {
    /// Run the full pipeline on a validated DAG.
    pub fn layout(dag: &DagGraph, size: LayoutSize) -> LayoutResult {
        let mut result = LayoutResult::new(size);
        if dag.node_count() == 0 {
            return result;
        }

        let la = LayerAssignment::longest_path(dag);
        let aug = insert_dummy_nodes(dag, &la);
        let ordering = minimise_crossings(&aug);
        let positions = assign_coordinates(&ordering, size);

        for (layer_idx, layer_nodes) in ordering.iter().enumerate() {
            for (order, node_id) in layer_nodes.iter().enumerate() {
                if AugmentedGraph::is_dummy(node_id) {
                    continue;
                }
                let p = positions[node_id];
                result
                    .nodes
                    .push(LayoutNode::new(node_id.clone(), layer_idx, order, p.x, p.y));
            }
        }

        for chain in &aug.chains {
            let mut edge = LayoutEdge::new(chain.source.clone(), chain.target.clone());
            edge.points = std::iter::once(&chain.source)
                .chain(chain.dummy_ids.iter())
                .chain(std::iter::once(&chain.target))
                .filter_map(|id| positions.get(id).copied())
                .collect();
            result.edges.push(edge);
        }

        result.layer_count = la.layer_count;
        tracing::debug!(
            nodes = result.nodes.len(),
            edges = result.edges.len(),
            layers = result.layer_count,
            "layout computed"
        );
        result
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_sugiyama.rs"]
mod tests;
