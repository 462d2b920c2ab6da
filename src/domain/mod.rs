// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust types describing what the system works with:
//
//   subgraph.rs - one enclosing subgraph around an
//                 lncRNA–protein pair, with its label
//   metrics.rs  - binary confusion counts and the five
//                 reported classification metrics
//   traits.rs   - abstractions the other layers implement
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled subgraph sample
pub mod subgraph;

// Confusion matrix and derived metrics
pub mod metrics;

// Core abstractions (traits) that other layers implement
pub mod traits;
