// ============================================================================
// spark-selection - Bidirectional Selection Sync for Rust
// ============================================================================
//
// Keeps a multi-selection control's selected items and an application-owned
// list in step, in both directions, without the feedback loop that two-way
// propagation creates. Single-threaded: every propagation runs synchronously
// inside the mutation or event that caused it.
// ============================================================================

pub mod collections;
pub mod controls;
pub mod core;
pub mod error;
pub mod sync;

// Re-export core items at crate root for ergonomic access
pub use core::subscription::{Subscription, UnsubscribeFn};
pub use core::types::{
    ChangeKind, ControlId, ListChange, ListChangeHandler, ListId, SelectionChanged,
    SelectionChangedHandler,
};
pub use error::{Result, SyncError};

// Re-export both sides of a binding
pub use collections::{
    ExternalList, NativeSelection, ObservableList, ObservableVec, PlainList, SharedList,
};
pub use controls::{DataGrid, Element, ListBox, SelectionAdapter, SelectionMode, TextBlock};

// Re-export the engine
pub use sync::{SyncEngine, SyncOptions};

// =============================================================================
// TESTS
// =============================================================================
