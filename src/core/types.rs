// ============================================================================
// spark-selection - Type Definitions
// Identities, change payloads and handler types shared by every layer
// ============================================================================

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SyncError;

// =============================================================================
// IDENTITIES
// =============================================================================
//
// Controls and lists are compared by identity, never by contents. Each one
// draws a fresh id when it is constructed and keeps it for its whole life,
// so cloned handles to the same control or list share the id.
// =============================================================================

static NEXT_CONTROL_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a UI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

impl ControlId {
    /// Allocate a fresh, never-before-used control id.
    pub fn next() -> Self {
        Self(NEXT_CONTROL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

/// Stable identity of an external list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(u64);

impl ListId {
    /// Allocate a fresh, never-before-used list id.
    pub fn next() -> Self {
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{}", self.0)
    }
}

// =============================================================================
// LIST CHANGES
// =============================================================================

/// The kind of a list change notification, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Remove,
    Replace,
    Move,
    Reset,
}

impl ChangeKind {
    /// Whether the sync engine knows how to mirror this kind of change.
    ///
    /// `Replace` and `Move` are reported by lists but have no mirrored
    /// counterpart on a control's selection.
    pub fn is_supported(self) -> bool {
        matches!(self, ChangeKind::Insert | ChangeKind::Remove | ChangeKind::Reset)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Remove => "remove",
            ChangeKind::Replace => "replace",
            ChangeKind::Move => "move",
            ChangeKind::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// A change notification emitted by an observable list after it mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum ListChange<T> {
    /// `items` were inserted starting at `index`.
    Insert { index: usize, items: Vec<T> },
    /// `items` were removed; `index` is where the first one used to be.
    Remove { index: usize, items: Vec<T> },
    /// The items starting at `index` were overwritten.
    Replace {
        index: usize,
        old: Vec<T>,
        new: Vec<T>,
    },
    /// `items` moved from `from` to `to`.
    Move { from: usize, to: usize, items: Vec<T> },
    /// The contents changed wholesale; re-read the list.
    Reset,
}

impl<T> ListChange<T> {
    /// The kind of this change.
    pub fn kind(&self) -> ChangeKind {
        match self {
            ListChange::Insert { .. } => ChangeKind::Insert,
            ListChange::Remove { .. } => ChangeKind::Remove,
            ListChange::Replace { .. } => ChangeKind::Replace,
            ListChange::Move { .. } => ChangeKind::Move,
            ListChange::Reset => ChangeKind::Reset,
        }
    }
}

// =============================================================================
// SELECTION CHANGES
// =============================================================================

/// A native selection-changed event: the items that left the selection and
/// the items that joined it, each in the order the control reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChanged<T> {
    pub removed: Vec<T>,
    pub added: Vec<T>,
}

impl<T> SelectionChanged<T> {
    pub fn new(removed: Vec<T>, added: Vec<T>) -> Self {
        Self { removed, added }
    }

    pub fn added(items: Vec<T>) -> Self {
        Self::new(Vec::new(), items)
    }

    pub fn removed(items: Vec<T>) -> Self {
        Self::new(items, Vec::new())
    }

    /// True when nothing joined or left the selection.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Subscriber for list change notifications.
pub type ListChangeHandler<T> = Rc<dyn Fn(&ListChange<T>) -> Result<(), SyncError>>;

/// Subscriber for native selection-changed events.
pub type SelectionChangedHandler<T> = Rc<dyn Fn(&SelectionChanged<T>) -> Result<(), SyncError>>;

// =============================================================================
// TESTS
// =============================================================================
