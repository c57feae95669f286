// ============================================================================
// spark-selection - Subscriptions
// RAII handles for event registrations plus the subscriber list behind them
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Cleanup run when a subscription is released.
pub type UnsubscribeFn = Box<dyn FnOnce()>;

/// A registration with some event source.
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the
/// handler from its source. If the source is already gone this is a no-op.
#[must_use = "dropping a Subscription immediately unsubscribes it"]
pub struct Subscription {
    unsubscribe: Option<UnsubscribeFn>,
}

impl Subscription {
    /// Wrap the cleanup that removes a handler from its source.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Release the registration now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

// =============================================================================
// SUBSCRIBERS
// =============================================================================

/// Ordered handler registry owned by an event source.
///
/// Handlers are called from a snapshot so a handler may subscribe,
/// unsubscribe or re-enter the source without hitting a live borrow.
pub(crate) struct Subscribers<H> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, H)>>,
}

impl<H: Clone> Subscribers<H> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Register a handler, returning the key that removes it.
    pub(crate) fn add(&self, handler: H) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, handler));
        id
    }

    pub(crate) fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(key, _)| *key != id);
    }

    /// Handlers in registration order.
    pub(crate) fn snapshot(&self) -> Vec<H> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn drop_runs_unsubscribe_once() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        {
            let _sub = Subscription::new(move || calls_clone.set(calls_clone.get() + 1));
            assert_eq!(calls.get(), 0);
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn explicit_unsubscribe_does_not_run_twice() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let sub = Subscription::new(move || calls_clone.set(calls_clone.get() + 1));
        sub.unsubscribe();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscribers_keep_registration_order() {
        let subs: Subscribers<&'static str> = Subscribers::new();
        let a = subs.add("a");
        subs.add("b");
        subs.add("c");
        assert_eq!(subs.snapshot(), vec!["a", "b", "c"]);

        subs.remove(a);
        assert_eq!(subs.snapshot(), vec!["b", "c"]);
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn removing_unknown_key_is_noop() {
        let subs: Subscribers<u8> = Subscribers::new();
        subs.add(1);
        subs.remove(99);
        assert_eq!(subs.len(), 1);
    }
}
