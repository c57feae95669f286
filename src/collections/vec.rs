// ============================================================================
// spark-selection - ObservableVec
// An ordered list that reports every mutation to its subscribers
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::list::{ExternalList, ObservableList, SharedList};
use crate::core::subscription::{Subscribers, Subscription};
use crate::core::types::{ListChange, ListChangeHandler, ListId};
use crate::error::Result;

// =============================================================================
// OBSERVABLE VEC
// =============================================================================

struct ObservableVecInner<T> {
    id: ListId,
    data: RefCell<Vec<T>>,
    subscribers: Subscribers<ListChangeHandler<T>>,
}

/// A shared, ordered list with change notifications.
///
/// Every mutation is applied first and then reported to subscribers, in
/// subscription order, as a [`ListChange`]:
///
/// | operation                     | notification |
/// |-------------------------------|--------------|
/// | `push`, `insert`, `extend`    | `Insert`     |
/// | `remove_item`, `remove_at`    | `Remove`     |
/// | `clear`, `replace_all`        | `Reset`      |
/// | `set`                         | `Replace`    |
/// | `move_item`                   | `Move`       |
///
/// No internal borrow is held while subscribers run, so a subscriber may read
/// or mutate the list again. The first subscriber error stops the fan-out and
/// is returned from the mutating call.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use spark_selection::{ChangeKind, ObservableVec};
///
/// let list = ObservableVec::from_vec(vec!["a"]);
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let seen_clone = seen.clone();
/// let _sub = list.subscribe(move |change| {
///     seen_clone.borrow_mut().push(change.kind());
///     Ok(())
/// });
///
/// list.push("b").unwrap();
/// list.clear().unwrap();
/// assert_eq!(*seen.borrow(), vec![ChangeKind::Insert, ChangeKind::Reset]);
/// ```
pub struct ObservableVec<T> {
    inner: Rc<ObservableVecInner<T>>,
}

impl<T> Clone for ObservableVec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ObservableVec<T> {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a list from an existing vec.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Rc::new(ObservableVecInner {
                id: ListId::next(),
                data: RefCell::new(data),
                subscribers: Subscribers::new(),
            }),
        }
    }

    /// Type-erased handle for handing the list to the engine.
    pub fn shared(&self) -> SharedList<T> {
        Rc::new(self.clone())
    }

    pub fn id(&self) -> ListId {
        self.inner.id
    }

    pub fn len(&self) -> usize {
        self.inner.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner.data.borrow().contains(item)
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.data.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.inner.data.borrow().clone()
    }

    // =========================================================================
    // SUBSCRIBERS
    // =========================================================================

    /// Register a change handler. Dropping the returned handle unsubscribes.
    pub fn subscribe(
        &self,
        handler: impl Fn(&ListChange<T>) -> Result<()> + 'static,
    ) -> Subscription {
        self.subscribe_handler(Rc::new(handler))
    }

    fn subscribe_handler(&self, handler: ListChangeHandler<T>) -> Subscription {
        let key = self.inner.subscribers.add(handler);
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.remove(key);
            }
        })
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    fn notify(&self, change: ListChange<T>) -> Result<()> {
        for handler in self.inner.subscribers.snapshot() {
            handler(&change)?;
        }
        Ok(())
    }

    // =========================================================================
    // INSERT
    // =========================================================================

    /// Append an item.
    pub fn push(&self, item: T) -> Result<()> {
        let index = {
            let mut data = self.inner.data.borrow_mut();
            data.push(item.clone());
            data.len() - 1
        };
        self.notify(ListChange::Insert {
            index,
            items: vec![item],
        })
    }

    /// Insert an item at `index`, shifting later items right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        self.inner.data.borrow_mut().insert(index, item.clone());
        self.notify(ListChange::Insert {
            index,
            items: vec![item],
        })
    }

    /// Append several items as a single notification.
    pub fn extend<I: IntoIterator<Item = T>>(&self, iter: I) -> Result<()> {
        let items: Vec<T> = iter.into_iter().collect();
        if items.is_empty() {
            return Ok(());
        }
        let index = {
            let mut data = self.inner.data.borrow_mut();
            let index = data.len();
            data.extend(items.iter().cloned());
            index
        };
        self.notify(ListChange::Insert { index, items })
    }

    // =========================================================================
    // REMOVE
    // =========================================================================

    /// Remove the first item equal to `item`. Returns whether one was found.
    pub fn remove_item(&self, item: &T) -> Result<bool> {
        let removed = {
            let mut data = self.inner.data.borrow_mut();
            let position = data.iter().position(|candidate| candidate == item);
            position.map(|index| (index, data.remove(index)))
        };
        match removed {
            Some((index, item)) => {
                self.notify(ListChange::Remove {
                    index,
                    items: vec![item],
                })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove and return the item at `index`, if it exists.
    pub fn remove_at(&self, index: usize) -> Result<Option<T>> {
        let removed = {
            let mut data = self.inner.data.borrow_mut();
            (index < data.len()).then(|| data.remove(index))
        };
        match removed {
            Some(item) => {
                self.notify(ListChange::Remove {
                    index,
                    items: vec![item.clone()],
                })?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // RESET
    // =========================================================================

    /// Remove every item. Reported as `Reset`.
    pub fn clear(&self) -> Result<()> {
        self.inner.data.borrow_mut().clear();
        self.notify(ListChange::Reset)
    }

    /// Swap in new contents wholesale. Reported as `Reset`.
    pub fn replace_all(&self, items: Vec<T>) -> Result<()> {
        *self.inner.data.borrow_mut() = items;
        self.notify(ListChange::Reset)
    }

    // =========================================================================
    // REPLACE / MOVE
    // =========================================================================

    /// Overwrite the item at `index`, returning the old one.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn set(&self, index: usize, item: T) -> Result<T> {
        let old = std::mem::replace(&mut self.inner.data.borrow_mut()[index], item.clone());
        self.notify(ListChange::Replace {
            index,
            old: vec![old.clone()],
            new: vec![item],
        })?;
        Ok(old)
    }

    /// Move the item at `from` so it ends up at `to`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn move_item(&self, from: usize, to: usize) -> Result<()> {
        let item = {
            let mut data = self.inner.data.borrow_mut();
            assert!(to < data.len(), "move target {to} out of bounds");
            let item = data.remove(from);
            data.insert(to, item.clone());
            item
        };
        self.notify(ListChange::Move {
            from,
            to,
            items: vec![item],
        })
    }
}

impl<T: Clone + PartialEq + 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CONTRACT IMPLEMENTATIONS
// =============================================================================

impl<T: Clone + PartialEq + 'static> ExternalList<T> for ObservableVec<T> {
    fn list_id(&self) -> ListId {
        self.id()
    }

    fn len(&self) -> usize {
        ObservableVec::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        ObservableVec::to_vec(self)
    }

    fn push(&self, item: T) -> Result<()> {
        ObservableVec::push(self, item)
    }

    fn remove_item(&self, item: &T) -> Result<bool> {
        ObservableVec::remove_item(self, item)
    }

    fn clear(&self) -> Result<()> {
        ObservableVec::clear(self)
    }

    fn as_observable(&self) -> Option<&dyn ObservableList<T>> {
        Some(self)
    }
}

impl<T: Clone + PartialEq + 'static> ObservableList<T> for ObservableVec<T> {
    fn subscribe(&self, handler: ListChangeHandler<T>) -> Subscription {
        self.subscribe_handler(handler)
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVec")
            .field("id", &self.inner.id)
            .field("data", &self.inner.data.borrow())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ChangeKind;
    use crate::error::SyncError;
    use std::cell::Cell;

    fn record<T: Clone + PartialEq + 'static>(
        list: &ObservableVec<T>,
    ) -> (Rc<RefCell<Vec<ListChange<T>>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let sub = list.subscribe(move |change| {
            log_clone.borrow_mut().push(change.clone());
            Ok(())
        });
        (log, sub)
    }

    #[test]
    fn push_and_insert_report_position() {
        let list = ObservableVec::from_vec(vec![1, 2]);
        let (log, _sub) = record(&list);

        list.push(3).unwrap();
        list.insert(0, 0).unwrap();

        assert_eq!(list.to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(
            *log.borrow(),
            vec![
                ListChange::Insert {
                    index: 2,
                    items: vec![3]
                },
                ListChange::Insert {
                    index: 0,
                    items: vec![0]
                },
            ]
        );
    }

    #[test]
    fn extend_is_one_notification() {
        let list = ObservableVec::from_vec(vec![1]);
        let (log, _sub) = record(&list);

        list.extend([2, 3]).unwrap();
        list.extend(Vec::new()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![ListChange::Insert {
                index: 1,
                items: vec![2, 3]
            }]
        );
    }

    #[test]
    fn remove_item_only_notifies_on_hit() {
        let list = ObservableVec::from_vec(vec!["a", "b", "a"]);
        let (log, _sub) = record(&list);

        assert!(list.remove_item(&"a").unwrap());
        assert!(!list.remove_item(&"z").unwrap());

        assert_eq!(list.to_vec(), vec!["b", "a"]);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(
            log.borrow()[0],
            ListChange::Remove {
                index: 0,
                items: vec!["a"]
            }
        );
    }

    #[test]
    fn remove_at_out_of_bounds_is_none() {
        let list = ObservableVec::from_vec(vec![1]);
        let (log, _sub) = record(&list);

        assert_eq!(list.remove_at(5).unwrap(), None);
        assert_eq!(list.remove_at(0).unwrap(), Some(1));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn clear_and_replace_all_reset() {
        let list = ObservableVec::from_vec(vec![1, 2]);
        let (log, _sub) = record(&list);

        list.replace_all(vec![9]).unwrap();
        assert_eq!(list.to_vec(), vec![9]);
        list.clear().unwrap();
        assert!(list.is_empty());

        let kinds: Vec<_> = log.borrow().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![ChangeKind::Reset, ChangeKind::Reset]);
    }

    #[test]
    fn set_and_move_report_their_kinds() {
        let list = ObservableVec::from_vec(vec![1, 2, 3]);
        let (log, _sub) = record(&list);

        assert_eq!(list.set(1, 20).unwrap(), 2);
        list.move_item(0, 2).unwrap();

        assert_eq!(list.to_vec(), vec![20, 3, 1]);
        let kinds: Vec<_> = log.borrow().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![ChangeKind::Replace, ChangeKind::Move]);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let list = ObservableVec::new();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let sub = list.subscribe(move |_| {
            calls_clone.set(calls_clone.get() + 1);
            Ok(())
        });
        assert_eq!(list.subscriber_count(), 1);

        list.push(1).unwrap();
        drop(sub);
        list.push(2).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(list.subscriber_count(), 0);
    }

    #[test]
    fn first_error_stops_fan_out() {
        let list = ObservableVec::new();
        let later_calls = Rc::new(Cell::new(0));

        let _failing = list.subscribe(|change| {
            Err(SyncError::UnsupportedChange {
                kind: change.kind(),
            })
        });
        let later_clone = later_calls.clone();
        let _later = list.subscribe(move |_| {
            later_clone.set(later_clone.get() + 1);
            Ok(())
        });

        let err = list.push(1).unwrap_err();
        assert_eq!(
            err,
            SyncError::UnsupportedChange {
                kind: ChangeKind::Insert
            }
        );
        // The mutation itself already happened.
        assert_eq!(list.to_vec(), vec![1]);
        assert_eq!(later_calls.get(), 0);
    }

    #[test]
    fn subscribers_may_reenter_the_list() {
        let list = ObservableVec::from_vec(vec![1]);
        let list_clone = list.clone();
        let observed = Rc::new(Cell::new(0));
        let observed_clone = observed.clone();

        let _sub = list.subscribe(move |_| {
            observed_clone.set(list_clone.len());
            Ok(())
        });

        list.push(2).unwrap();
        assert_eq!(observed.get(), 2);
    }

    #[test]
    fn observable_through_contract() {
        let list: ObservableVec<i32> = ObservableVec::new();
        let shared = list.shared();
        assert!(shared.as_observable().is_some());
        assert_eq!(shared.list_id(), list.id());
    }

    #[test]
    fn debug_format() {
        let list = ObservableVec::from_vec(vec!["item"]);
        let debug = format!("{:?}", list);
        assert!(debug.contains("ObservableVec"));
        assert!(debug.contains("item"));
    }
}
