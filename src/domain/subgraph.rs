// ============================================================
// Layer 3: SubgraphSample Domain Type
// ============================================================
// An interaction candidate is represented by the subgraph
// surrounding the lncRNA node and the protein node, cut at a
// fixed hop distance. Every node carries a feature vector
// (its node2vec embedding plus any extra attributes). The
// sample label says whether the pair interacts.
//
//   label = 1  → known interaction (positive)
//   label = 0  → sampled non-interaction (negative)
//
// Edges are undirected and listed once. The batcher emits
// both directions when building message-passing indices.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// Label of an interacting pair
pub const POSITIVE: usize = 1;

/// Label of a non-interacting pair
pub const NEGATIVE: usize = 0;

/// One labelled enclosing subgraph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubgraphSample {
    /// Row i holds the features of node i
    pub node_features: Vec<Vec<f32>>,

    /// Undirected edges as pairs of node indices
    #[serde(default)]
    pub edges: Vec<[usize; 2]>,

    /// 1 = interaction, 0 = no interaction
    pub label: usize,

    /// Identifier of the lncRNA of the target pair, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lncrna: Option<String>,

    /// Identifier of the protein of the target pair, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
}

impl SubgraphSample {
    pub fn new(node_features: Vec<Vec<f32>>, edges: Vec<[usize; 2]>, label: usize) -> Self {
        Self {
            node_features,
            edges,
            label,
            lncrna:  None,
            protein: None,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.node_features.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Width of the node feature rows (0 for an empty graph)
    pub fn num_node_features(&self) -> usize {
        self.node_features.first().map_or(0, Vec::len)
    }

    pub fn is_positive(&self) -> bool {
        self.label == POSITIVE
    }

    /// Check the structural invariants of the sample.
    ///
    /// Returns a human readable reason on the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.node_features.is_empty() {
            return Err("subgraph has no nodes".to_string());
        }

        let width = self.num_node_features();
        if width == 0 {
            return Err("node feature vectors are empty".to_string());
        }
        if let Some(row) = self.node_features.iter().position(|r| r.len() != width) {
            return Err(format!(
                "node {row} has {} features, expected {width}",
                self.node_features[row].len()
            ));
        }

        let n = self.num_nodes();
        if let Some([a, b]) = self.edges.iter().find(|[a, b]| *a >= n || *b >= n) {
            return Err(format!("edge ({a}, {b}) references a node outside 0..{n}"));
        }

        if self.label != POSITIVE && self.label != NEGATIVE {
            return Err(format!("label {} is not 0 or 1", self.label));
        }

        Ok(())
    }
}
