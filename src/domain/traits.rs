// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits
// rather than the concrete loaders, so a different storage
// format only needs a new implementation.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::subgraph::SubgraphSample;

// ─── SubgraphSource ───────────────────────────────────────────────────────────
/// Any component that can produce the labelled subgraphs of a dataset.
///
/// Implementations:
///   - JsonlSubgraphLoader → reads `subgraphs.jsonl` from a dataset directory
pub trait SubgraphSource {
    /// Load every sample, in stored order.
    fn load_all(&self) -> Result<Vec<SubgraphSample>>;
}
