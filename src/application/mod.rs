// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Each use case coordinates the other layers to reach one
// goal; it holds no model math and no file formats.
//
//   train_use_case    - k-fold cross-validation training run
//   evaluate_use_case - rescore a saved fold checkpoint
//   analyze_use_case  - dataset and fold statistics
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The cross-validation training workflow
pub mod train_use_case;

// Reloading a checkpoint and scoring it
pub mod evaluate_use_case;

// Dataset inspection without training
pub mod analyze_use_case;
