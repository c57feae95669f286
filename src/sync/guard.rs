// ============================================================================
// spark-selection - Update Guards
// ============================================================================
//
// A guard marks one control or list as "being written by the engine" for the
// duration of exactly one propagation call. The mark is removed on drop, so
// it is cleared on every exit path: normal return, `?` early return, or
// unwinding out of a panicking handler.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;

/// Scoped membership of `key` in a guard set.
pub(crate) struct UpdateGuard<'a, K: Eq + Hash + Copy> {
    set: &'a RefCell<HashSet<K>>,
    key: K,
    /// False when the key was already present; the outer guard owns removal.
    owned: bool,
}

impl<'a, K: Eq + Hash + Copy> UpdateGuard<'a, K> {
    pub(crate) fn enter(set: &'a RefCell<HashSet<K>>, key: K) -> Self {
        let owned = set.borrow_mut().insert(key);
        Self { set, key, owned }
    }
}

impl<K: Eq + Hash + Copy> Drop for UpdateGuard<'_, K> {
    fn drop(&mut self) {
        if self.owned {
            self.set.borrow_mut().remove(&self.key);
        }
    }
}
