// ============================================================================
// spark-selection - Core Module
// Identities, change payloads and subscription handles
// ============================================================================

pub mod subscription;
pub mod types;

// Re-export commonly used items
pub use subscription::{Subscription, UnsubscribeFn};
pub use types::{
    ChangeKind, ControlId, ListChange, ListChangeHandler, ListId, SelectionChanged,
    SelectionChangedHandler,
};
