// ============================================================================
// spark-selection - Sync Context
// Registry of live bindings plus the two reentrancy guard sets
// ============================================================================

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use super::guard::UpdateGuard;
use super::options::SyncOptions;
use crate::collections::SharedList;
use crate::controls::SelectionAdapter;
use crate::core::subscription::Subscription;
use crate::core::types::{ControlId, ListId};

// =============================================================================
// BINDING
// =============================================================================

/// One control synchronized with one external list.
pub(crate) struct Binding<T> {
    pub(crate) list: SharedList<T>,
    /// Registration with the list's change feed. `None` for lists without one.
    pub(crate) list_subscription: Option<Subscription>,
}

impl<T> Binding<T> {
    pub(crate) fn is_observable(&self) -> bool {
        self.list_subscription.is_some()
    }
}

/// A control the engine listens to, bound or not.
pub(crate) struct Attachment<T> {
    pub(crate) adapter: SelectionAdapter<T>,
    pub(crate) selection_subscription: Subscription,
}

// =============================================================================
// SYNC CONTEXT
// =============================================================================

/// All mutable state of one engine.
///
/// Owned through an `Rc` by the engine handles; event handlers only hold a
/// `Weak` so that dropping the last engine handle tears everything down.
pub(crate) struct SyncContext<T> {
    pub(crate) options: SyncOptions,

    // =========================================================================
    // REGISTRY
    // =========================================================================
    /// Current binding per control. At most one per control.
    pub(crate) bindings: RefCell<HashMap<ControlId, Binding<T>>>,

    /// Selection-changed registration per attached control. Present even when
    /// the control currently has no binding.
    pub(crate) attachments: RefCell<HashMap<ControlId, Attachment<T>>>,

    // =========================================================================
    // GUARDS
    // =========================================================================
    /// Lists the engine is writing to right now, each paired with the
    /// control whose selection change caused the write.
    pub(crate) lists_updating: RefCell<HashSet<(ListId, ControlId)>>,

    /// Controls the engine is writing to right now.
    pub(crate) controls_updating: RefCell<HashSet<ControlId>>,
}

impl<T> SyncContext<T> {
    pub(crate) fn new(options: SyncOptions) -> Self {
        Self {
            options,
            bindings: RefCell::new(HashMap::new()),
            attachments: RefCell::new(HashMap::new()),
            lists_updating: RefCell::new(HashSet::new()),
            controls_updating: RefCell::new(HashSet::new()),
        }
    }

    // =========================================================================
    // GUARDS
    // =========================================================================

    pub(crate) fn guard_list(
        &self,
        list: ListId,
        writer: ControlId,
    ) -> UpdateGuard<'_, (ListId, ControlId)> {
        UpdateGuard::enter(&self.lists_updating, (list, writer))
    }

    pub(crate) fn guard_control(&self, control: ControlId) -> UpdateGuard<'_, ControlId> {
        UpdateGuard::enter(&self.controls_updating, control)
    }

    /// Whether the engine is writing to `list` on behalf of any control.
    pub(crate) fn is_list_updating(&self, list: ListId) -> bool {
        self.lists_updating
            .borrow()
            .iter()
            .any(|(updating, _)| *updating == list)
    }

    /// Whether the engine is writing to `list` on behalf of `writer`.
    pub(crate) fn is_list_updating_for(&self, list: ListId, writer: ControlId) -> bool {
        self.lists_updating.borrow().contains(&(list, writer))
    }

    pub(crate) fn is_control_updating(&self, control: ControlId) -> bool {
        self.controls_updating.borrow().contains(&control)
    }

    // =========================================================================
    // REGISTRY
    // =========================================================================

    pub(crate) fn insert_binding(&self, control: ControlId, binding: Binding<T>) {
        // Callers release first, so a replaced binding here would be a bug in
        // the attach protocol. Drop it outside the borrow regardless.
        let previous = self.bindings.borrow_mut().insert(control, binding);
        drop(previous);
    }

    pub(crate) fn bound_list(&self, control: ControlId) -> Option<SharedList<T>> {
        self.bindings
            .borrow()
            .get(&control)
            .map(|binding| binding.list.clone())
    }

    /// The list a control's own selection changes should be written to.
    pub(crate) fn mirror_target(&self, control: ControlId) -> Option<SharedList<T>> {
        let bindings = self.bindings.borrow();
        let binding = bindings.get(&control)?;
        if !binding.is_observable() && !self.options.mirror_unobservable {
            trace!("{control} bound to unobservable {}, not mirroring", binding.list.list_id());
            return None;
        }
        Some(binding.list.clone())
    }

    pub(crate) fn insert_attachment(&self, control: ControlId, attachment: Attachment<T>) {
        let previous = self.attachments.borrow_mut().insert(control, attachment);
        drop(previous);
    }

    /// Drop the attachment and binding of `control`, releasing both
    /// subscriptions. Returns whether it had a binding.
    pub(crate) fn release(&self, control: ControlId) -> bool {
        let attachment = self.attachments.borrow_mut().remove(&control);
        let binding = self.bindings.borrow_mut().remove(&control);
        let had_binding = binding.is_some();
        if let Some(binding) = &binding {
            debug!("detached {control} from {}", binding.list.list_id());
        }
        drop(attachment);
        drop(binding);
        had_binding
    }

    /// Release every attached control that no longer offers a multi-item
    /// selection.
    pub(crate) fn release_incapable(&self) {
        let stale: Vec<ControlId> = self
            .attachments
            .borrow()
            .iter()
            .filter(|(_, attachment)| !attachment.adapter.is_capable())
            .map(|(control, _)| *control)
            .collect();
        for control in stale {
            debug!("{control} lost its multi-item selection, detaching");
            self.release(control);
        }
    }

    pub(crate) fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub(crate) fn attached_controls(&self) -> Vec<ControlId> {
        let mut controls: HashSet<ControlId> =
            self.attachments.borrow().keys().copied().collect();
        controls.extend(self.bindings.borrow().keys().copied());
        controls.into_iter().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
