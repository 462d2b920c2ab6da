// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Files a training run leaves behind:
//
//   checkpoint.rs - the run directory: refuses to reuse an
//                   existing run name, stores the run config
//                   as JSON and the model weights of every
//                   fold with Burn's CompactRecorder
//
//   run_log.rs    - log.txt (report lines, also printed) and
//                   metrics.csv (one row per evaluation)
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Run directory, config and model checkpoints
pub mod checkpoint;

/// Text report and CSV metrics of a run
pub mod run_log;
