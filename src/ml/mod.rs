// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All Burn model, optimiser and training code lives here.
//
//   model.rs     - graph convolution classifier over subgraphs
//   schedule.rs  - learning rate that decays when loss rises
//   trainer.rs   - one cross-validation fold: fresh model,
//                  epoch loop, periodic evaluation and
//                  checkpoints, final fold evaluation
//   evaluator.rs - confusion matrix of a model over a loader
//   backend.rs   - compute device selection (WGPU or CPU)
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Kingma & Ba (2015) Adam

/// Graph classifier architecture
pub mod model;

/// Loss-driven exponential learning-rate decay
pub mod schedule;

/// Per-fold training loop with evaluation and checkpointing
pub mod trainer;

/// Inference-mode evaluation
pub mod evaluator;

/// Backend and device selection
pub mod backend;
