// ============================================================================
// spark-selection - Sync Module
// Binding registry, reentrancy guards and the two propagation directions
// ============================================================================

mod context;
mod engine;
mod guard;
mod options;
mod propagate;

pub use engine::SyncEngine;
pub use options::SyncOptions;
