// ============================================================================
// spark-selection - NativeSelection
// A control's own selected-items collection and its selection-changed event
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::subscription::{Subscribers, Subscription};
use crate::core::types::{SelectionChanged, SelectionChangedHandler};
use crate::error::Result;

// =============================================================================
// NATIVE SELECTION
// =============================================================================

struct NativeSelectionInner<T> {
    items: RefCell<Vec<T>>,
    subscribers: Subscribers<SelectionChangedHandler<T>>,
}

/// The mutable selection a selection-capable control owns.
///
/// Membership is set-like: an item is either selected or not, and adding an
/// already-selected item does nothing. Items keep the order in which they were
/// selected, which only affects display.
///
/// Every effective change raises one [`SelectionChanged`] event carrying the
/// items that left and the items that joined. Calls that change nothing raise
/// nothing.
///
/// # Example
///
/// ```
/// use spark_selection::NativeSelection;
///
/// let selection = NativeSelection::new();
/// selection.push("a").unwrap();
/// selection.extend(["b", "a"]).unwrap();
/// assert_eq!(selection.items(), vec!["a", "b"]);
///
/// selection.apply(&["a"], &["c"]).unwrap();
/// assert_eq!(selection.items(), vec!["b", "c"]);
/// ```
pub struct NativeSelection<T> {
    inner: Rc<NativeSelectionInner<T>>,
}

impl<T> Clone for NativeSelection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> NativeSelection<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(NativeSelectionInner {
                items: RefCell::new(Vec::new()),
                subscribers: Subscribers::new(),
            }),
        }
    }

    /// Selected items, in selection order.
    pub fn items(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner.items.borrow().contains(item)
    }

    /// Whether two handles point at the same selection.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // SUBSCRIBERS
    // =========================================================================

    /// Register a selection-changed handler. Dropping the handle unsubscribes.
    pub fn subscribe(
        &self,
        handler: impl Fn(&SelectionChanged<T>) -> Result<()> + 'static,
    ) -> Subscription {
        self.subscribe_handler(Rc::new(handler))
    }

    /// Register an already shared handler.
    pub fn subscribe_handler(&self, handler: SelectionChangedHandler<T>) -> Subscription {
        let key = self.inner.subscribers.add(handler);
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.remove(key);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    fn raise(&self, change: SelectionChanged<T>) -> Result<()> {
        if change.is_empty() {
            return Ok(());
        }
        for handler in self.inner.subscribers.snapshot() {
            handler(&change)?;
        }
        Ok(())
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Select one item.
    pub fn push(&self, item: T) -> Result<()> {
        self.extend([item])
    }

    /// Select several items, raising a single event for the ones that were
    /// not already selected.
    pub fn extend<I: IntoIterator<Item = T>>(&self, iter: I) -> Result<()> {
        self.apply(&[], &iter.into_iter().collect::<Vec<_>>())
    }

    /// Deselect one item. Returns whether it was selected.
    pub fn remove(&self, item: &T) -> Result<bool> {
        let was_selected = self.contains(item);
        self.apply(std::slice::from_ref(item), &[])?;
        Ok(was_selected)
    }

    /// Deselect everything.
    pub fn clear(&self) -> Result<()> {
        let removed = std::mem::take(&mut *self.inner.items.borrow_mut());
        self.raise(SelectionChanged::removed(removed))
    }

    /// Deselect `removed`, then select `added`, as one event.
    ///
    /// This is the shape of change a user gesture produces (a click that
    /// moves the selection from one row to another).
    pub fn apply(&self, removed: &[T], added: &[T]) -> Result<()> {
        let change = {
            let mut items = self.inner.items.borrow_mut();

            let mut gone = Vec::new();
            for item in removed {
                if let Some(index) = items.iter().position(|candidate| candidate == item) {
                    gone.push(items.remove(index));
                }
            }

            let mut joined = Vec::new();
            for item in added {
                if !items.contains(item) {
                    items.push(item.clone());
                    joined.push(item.clone());
                }
            }

            SelectionChanged::new(gone, joined)
        };
        self.raise(change)
    }
}

impl<T: Clone + PartialEq + 'static> Default for NativeSelection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for NativeSelection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeSelection")
            .field("items", &self.inner.items.borrow())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
