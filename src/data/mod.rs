// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between the subgraph files on disk and the
// tensor batches the model consumes:
//
//   subgraphs.jsonl
//       │
//       ▼
//   JsonlSubgraphLoader → reads and validates samples
//       │
//       ▼
//   SubgraphDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   k_fold              → contiguous test range per fold
//       │
//       ▼
//   SubgraphBatcher     → disjoint-union graph batches
//       │
//       ▼
//   DataLoader          → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads subgraph datasets from disk
pub mod loader;

/// Implements Burn's Dataset trait for subgraph samples
pub mod dataset;

/// Implements Burn's Batcher trait to merge subgraphs into batches
pub mod batcher;

/// k-fold partitioning and holdout splitting
pub mod splitter;

/// Class balance and graph size statistics
pub mod analysis;
