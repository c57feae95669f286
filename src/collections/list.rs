// ============================================================================
// spark-selection - External List Contract
// The application-owned side of a binding
// ============================================================================
//
// The engine never owns application lists. It only needs an ordered, mutable
// collection it can append to, remove from, clear and read back, plus an
// optional change feed. Lists without a change feed are synchronized once at
// attach time and never push changes into a control afterwards.
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::subscription::Subscription;
use crate::core::types::{ListChangeHandler, ListId};
use crate::error::Result;

// =============================================================================
// TRAITS
// =============================================================================

/// An ordered, mutable, application-owned collection.
///
/// Methods take `&self`: lists are shared handles and mutate through interior
/// mutability, the same way the application mutates them. Mutations return a
/// `Result` because an observable list runs its subscribers synchronously and
/// a subscriber may fail.
pub trait ExternalList<T> {
    /// Identity of the underlying list, shared by every handle to it.
    fn list_id(&self) -> ListId;

    /// Number of items.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the items in list order.
    fn to_vec(&self) -> Vec<T>;

    /// Append an item.
    fn push(&self, item: T) -> Result<()>;

    /// Remove the first item equal to `item`. Returns whether one was found.
    fn remove_item(&self, item: &T) -> Result<bool>;

    /// Remove every item.
    fn clear(&self) -> Result<()>;

    /// The change feed, if this list has one.
    fn as_observable(&self) -> Option<&dyn ObservableList<T>> {
        None
    }
}

/// A list that reports its mutations.
pub trait ObservableList<T> {
    /// Register a handler called after every mutation.
    fn subscribe(&self, handler: ListChangeHandler<T>) -> Subscription;
}

/// Shared, type-erased handle to an external list.
pub type SharedList<T> = Rc<dyn ExternalList<T>>;

// =============================================================================
// PLAIN LIST
// =============================================================================

struct PlainListInner<T> {
    id: ListId,
    data: RefCell<Vec<T>>,
}

/// An ordered list with no change feed.
///
/// Binding a control to a `PlainList` copies the list into the selection once.
/// Later mutations of the list are invisible to the control.
///
/// # Example
///
/// ```
/// use spark_selection::collections::{ExternalList, PlainList};
///
/// let list = PlainList::from_vec(vec!["a", "b"]);
/// list.push("c").unwrap();
/// assert_eq!(list.to_vec(), vec!["a", "b", "c"]);
/// assert!(list.as_observable().is_none());
/// ```
pub struct PlainList<T> {
    inner: Rc<PlainListInner<T>>,
}

impl<T> Clone for PlainList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> PlainList<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Rc::new(PlainListInner {
                id: ListId::next(),
                data: RefCell::new(data),
            }),
        }
    }

    /// Type-erased handle for handing the list to the engine.
    pub fn shared(&self) -> SharedList<T> {
        Rc::new(self.clone())
    }
}

impl<T: Clone + PartialEq + 'static> Default for PlainList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> ExternalList<T> for PlainList<T> {
    fn list_id(&self) -> ListId {
        self.inner.id
    }

    fn len(&self) -> usize {
        self.inner.data.borrow().len()
    }

    fn to_vec(&self) -> Vec<T> {
        self.inner.data.borrow().clone()
    }

    fn push(&self, item: T) -> Result<()> {
        self.inner.data.borrow_mut().push(item);
        Ok(())
    }

    fn remove_item(&self, item: &T) -> Result<bool> {
        let mut data = self.inner.data.borrow_mut();
        match data.iter().position(|candidate| candidate == item) {
            Some(index) => {
                data.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn clear(&self) -> Result<()> {
        self.inner.data.borrow_mut().clear();
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for PlainList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainList")
            .field("id", &self.inner.id)
            .field("data", &self.inner.data.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
