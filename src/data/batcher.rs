// ============================================================
// Layer 4: Subgraph Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SubgraphSample>
// into one batch the graph model can consume.
//
// Graphs of different sizes cannot be stacked along a batch
// dimension, so a batch is their disjoint union:
//
//   graph 0: nodes 0..n0        edges (a, b)
//   graph 1: nodes n0..n0+n1    edges (a + n0, b + n0)
//   ...
//
//   node_features: [total_nodes, num_features]
//   source/target: [2 · total_edges]  both directions of every edge
//   graph_index:   [total_nodes]      which graph a node belongs to
//   graph_sizes:   [num_graphs, 1]    node count per graph (for mean pooling)
//   labels:        [num_graphs]
//
// Reference: Burn Book §4 (Batcher)
//            PyG mini-batching of graphs (disjoint union)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::subgraph::SubgraphSample;

// ─── MergedGraphs ─────────────────────────────────────────────────────────────
/// Host-side disjoint union of several subgraphs, before any
/// tensor is created.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGraphs {
    /// Row-major node features, `num_nodes × num_features`
    pub features:     Vec<f32>,
    pub num_nodes:    usize,
    pub num_features: usize,
    /// Message sources, offset into the merged node numbering
    pub source:       Vec<i32>,
    /// Message targets, same length as `source`
    pub target:       Vec<i32>,
    pub graph_index:  Vec<i32>,
    pub graph_sizes:  Vec<f32>,
    pub labels:       Vec<i32>,
}

impl MergedGraphs {
    pub fn merge(items: &[SubgraphSample]) -> Self {
        let num_features = items.first().map_or(0, SubgraphSample::num_node_features);
        let num_nodes: usize = items.iter().map(SubgraphSample::num_nodes).sum();
        let num_messages: usize = items.iter().map(|s| 2 * s.num_edges()).sum();

        let mut merged = Self {
            features:     Vec::with_capacity(num_nodes * num_features),
            num_nodes,
            num_features,
            source:       Vec::with_capacity(num_messages),
            target:       Vec::with_capacity(num_messages),
            graph_index:  Vec::with_capacity(num_nodes),
            graph_sizes:  Vec::with_capacity(items.len()),
            labels:       Vec::with_capacity(items.len()),
        };

        let mut offset = 0usize;
        for (g, sample) in items.iter().enumerate() {
            for row in &sample.node_features {
                merged.features.extend_from_slice(row);
                merged.graph_index.push(g as i32);
            }

            for &[a, b] in &sample.edges {
                let (a, b) = ((a + offset) as i32, (b + offset) as i32);
                merged.source.push(a);
                merged.target.push(b);
                merged.source.push(b);
                merged.target.push(a);
            }

            merged.graph_sizes.push(sample.num_nodes() as f32);
            merged.labels.push(sample.label as i32);
            offset += sample.num_nodes();
        }

        merged
    }

    pub fn num_graphs(&self) -> usize {
        self.labels.len()
    }
}

// ─── SubgraphBatch ────────────────────────────────────────────────────────────
/// Message-passing indices of a batch.
#[derive(Debug, Clone)]
pub struct EdgeIndex<B: Backend> {
    pub source: Tensor<B, 1, Int>,
    pub target: Tensor<B, 1, Int>,
}

/// A batch of subgraphs ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SubgraphBatch<B: Backend> {
    /// [total_nodes, num_features]
    pub node_features: Tensor<B, 2>,

    /// None when no graph in the batch has an edge
    pub edges: Option<EdgeIndex<B>>,

    /// [total_nodes]
    pub graph_index: Tensor<B, 1, Int>,

    /// [num_graphs, 1]
    pub graph_sizes: Tensor<B, 2>,

    /// [num_graphs]
    pub labels: Tensor<B, 1, Int>,

    pub num_graphs: usize,
}

// ─── SubgraphBatcher ──────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct SubgraphBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SubgraphBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SubgraphSample, SubgraphBatch<B>> for SubgraphBatcher<B> {
    fn batch(&self, items: Vec<SubgraphSample>) -> SubgraphBatch<B> {
        let merged = MergedGraphs::merge(&items);
        let num_graphs = merged.num_graphs();

        let node_features = Tensor::<B, 1>::from_floats(
            merged.features.as_slice(), &self.device
        ).reshape([merged.num_nodes, merged.num_features]);

        let edges = if merged.source.is_empty() {
            None
        } else {
            Some(EdgeIndex {
                source: Tensor::<B, 1, Int>::from_ints(merged.source.as_slice(), &self.device),
                target: Tensor::<B, 1, Int>::from_ints(merged.target.as_slice(), &self.device),
            })
        };

        let graph_index = Tensor::<B, 1, Int>::from_ints(
            merged.graph_index.as_slice(), &self.device
        );

        let graph_sizes = Tensor::<B, 1>::from_floats(
            merged.graph_sizes.as_slice(), &self.device
        ).reshape([num_graphs, 1]);

        let labels = Tensor::<B, 1, Int>::from_ints(merged.labels.as_slice(), &self.device);

        SubgraphBatch {
            node_features,
            edges,
            graph_index,
            graph_sizes,
            labels,
            num_graphs,
        }
    }
}
