// ============================================================================
// spark-selection - Errors
// ============================================================================

use thiserror::Error;

use crate::core::types::ChangeKind;

/// Errors raised by the sync engine.
///
/// Both variants are raised synchronously at the point of detection and are
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The attachment trigger was used on an element that cannot hold a
    /// multi-item selection. This is a wiring mistake, not a runtime state.
    #[error("element `{element}` does not support multi-item selection")]
    NotSelectable { element: String },

    /// An external list reported a change the engine does not mirror.
    #[error("unsupported list change `{kind}`")]
    UnsupportedChange { kind: ChangeKind },
}

/// Result alias used across the crate.
pub type Result<T, E = SyncError> = std::result::Result<T, E>;
