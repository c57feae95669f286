// ============================================================================
// spark-selection - Collections
// Both sides of a binding: external lists and native selections
// ============================================================================
//
// External lists are application-owned and optionally observable:
//
// 1. ObservableVec: ordered, reports every mutation as a ListChange
// 2. PlainList: ordered, never reports anything
//
// A NativeSelection is what a control owns: set-like membership plus a
// selection-changed event carrying removed and added items.
// ============================================================================

mod list;
mod selection;
mod vec;

pub use list::{ExternalList, ObservableList, PlainList, SharedList};
pub use selection::NativeSelection;
pub use vec::ObservableVec;
