// ============================================================================
// spark-selection - Sync Engine
// Attach/detach protocol for bidirectional selection bindings
// ============================================================================
//
// attach(control, list):
//   1. detach(control) if anything is attached
//   2. no list -> stop binding (the control handler is still registered)
//   3. overwrite the control's selection with the list: clear, then append
//      in list order (never diff, so prior drift is repaired)
//   4. record the binding; observable lists also get the list -> control
//      handler, whose subscription the binding owns
//   5. register the control -> list handler on the control's selection event
//
// detach(control): drop the control handler and the binding (which releases
// the list subscription). Idempotent.
//
// A control that stops offering multi-selection after it was attached is
// detached by the first handler or query that notices.
// ============================================================================

use std::fmt;
use std::rc::Rc;

use log::debug;

use super::context::{Attachment, Binding, SyncContext};
use super::options::SyncOptions;
use super::propagate::{list_change_handler, selection_changed_handler};
use crate::collections::SharedList;
use crate::controls::{Element, SelectionAdapter};
use crate::core::types::{ControlId, ListId};
use crate::error::{Result, SyncError};

// =============================================================================
// SYNC ENGINE
// =============================================================================

/// Keeps controls' native selections and external lists in step.
///
/// An engine is a cheap-to-clone handle to its own registry and guard sets;
/// independent engines share nothing. Dropping the last handle releases every
/// subscription the engine made.
///
/// The engine is single-threaded: all propagation runs synchronously inside
/// the mutation or event that caused it.
///
/// # Example
///
/// ```
/// use spark_selection::{ListBox, ObservableVec, SyncEngine};
///
/// let engine: SyncEngine<&str> = SyncEngine::new();
/// let tags: ListBox<&str> = ListBox::new();
/// let chosen = ObservableVec::from_vec(vec!["rust", "ui"]);
///
/// engine.attach(&tags, Some(chosen.shared())).unwrap();
/// assert_eq!(tags.selected_items(), vec!["rust", "ui"]);
///
/// chosen.push("sync").unwrap();
/// assert_eq!(tags.selected_items(), vec!["rust", "ui", "sync"]);
///
/// tags.selection().apply(&["ui"], &[]).unwrap();
/// assert_eq!(chosen.to_vec(), vec!["rust", "sync"]);
/// ```
pub struct SyncEngine<T> {
    ctx: Rc<SyncContext<T>>,
}

impl<T> Clone for SyncEngine<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> SyncEngine<T> {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::with_options(SyncOptions::default())
    }

    pub fn with_options(options: SyncOptions) -> Self {
        Self {
            ctx: Rc::new(SyncContext::new(options)),
        }
    }

    pub fn options(&self) -> SyncOptions {
        self.ctx.options
    }

    // =========================================================================
    // ATTACH / DETACH
    // =========================================================================

    /// Bind `element` to `list`, replacing whatever it was bound to.
    ///
    /// Elements without a multi-selection capability are skipped silently;
    /// use [`SyncEngine::on_selected_items_changed`] to have that reported as
    /// an error instead.
    pub fn attach(&self, element: &dyn Element<T>, list: Option<SharedList<T>>) -> Result<()> {
        let Some(adapter) = SelectionAdapter::for_element(element) else {
            debug!("{} cannot hold a multi-item selection, not attaching", element.describe());
            return Ok(());
        };
        self.attach_adapter(&adapter, list)
    }

    /// [`SyncEngine::attach`] for an adapter obtained elsewhere.
    pub fn attach_adapter(
        &self,
        adapter: &SelectionAdapter<T>,
        list: Option<SharedList<T>>,
    ) -> Result<()> {
        let control = adapter.identity();
        let selection = adapter.native_selection();

        self.detach(control);

        if let Some(list) = list {
            let list_id = list.list_id();
            {
                let _guard = self.ctx.guard_control(control);
                selection.clear()?;
                selection.extend(list.to_vec())?;
            }

            let list_subscription = list.as_observable().map(|observable| {
                observable.subscribe(list_change_handler(
                    Rc::downgrade(&self.ctx),
                    adapter.clone(),
                    list_id,
                    Rc::downgrade(&list),
                ))
            });
            debug!(
                "attached {control} to {list_id} ({} item(s), {})",
                selection.len(),
                if list_subscription.is_some() {
                    "observable"
                } else {
                    "unobservable"
                }
            );
            self.ctx.insert_binding(
                control,
                Binding {
                    list,
                    list_subscription,
                },
            );
        }

        let selection_subscription = selection.subscribe_handler(selection_changed_handler(
            Rc::downgrade(&self.ctx),
            control,
            adapter.capability(),
        ));
        self.ctx.insert_attachment(
            control,
            Attachment {
                adapter: adapter.clone(),
                selection_subscription,
            },
        );
        Ok(())
    }

    /// Unbind a control. Returns whether it had a binding.
    pub fn detach(&self, control: ControlId) -> bool {
        self.ctx.release(control)
    }

    /// Unbind every control this engine has attached.
    pub fn detach_all(&self) {
        for control in self.ctx.attached_controls() {
            self.detach(control);
        }
    }

    // =========================================================================
    // ATTACHMENT TRIGGER
    // =========================================================================

    /// Property-change entry point: the list assigned to `element` changed
    /// from `old` to `new`.
    ///
    /// Unlike [`SyncEngine::attach`], assigning a list to an element without
    /// a multi-selection capability is a wiring error and is reported. Any
    /// old binding is released first, and unassigning (`new` is `None`)
    /// always succeeds.
    pub fn on_selected_items_changed(
        &self,
        element: &dyn Element<T>,
        old: Option<&SharedList<T>>,
        new: Option<SharedList<T>>,
    ) -> Result<()> {
        if old.is_some() {
            self.detach(element.control_id());
        }
        let Some(adapter) = SelectionAdapter::for_element(element) else {
            if new.is_none() {
                return Ok(());
            }
            let element = element.describe();
            debug!("selected items assigned to {element}, which has no multi-selection");
            return Err(SyncError::NotSelectable { element });
        };
        self.attach_adapter(&adapter, new)
    }

    /// Assign `list` as `element`'s selected items, using the currently bound
    /// list as the old value.
    pub fn set_selected_items(
        &self,
        element: &dyn Element<T>,
        list: Option<SharedList<T>>,
    ) -> Result<()> {
        let old = self.ctx.bound_list(element.control_id());
        self.on_selected_items_changed(element, old.as_ref(), list)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Whether `control` currently has a binding.
    pub fn is_bound(&self, control: ControlId) -> bool {
        self.ctx.release_incapable();
        self.ctx.bindings.borrow().contains_key(&control)
    }

    /// The list `control` is bound to.
    pub fn bound_list(&self, control: ControlId) -> Option<SharedList<T>> {
        self.ctx.release_incapable();
        self.ctx.bound_list(control)
    }

    /// Number of live bindings.
    pub fn binding_count(&self) -> usize {
        self.ctx.release_incapable();
        self.ctx.binding_count()
    }

    /// Whether the engine is writing to `control` right now.
    pub fn is_control_updating(&self, control: ControlId) -> bool {
        self.ctx.is_control_updating(control)
    }

    /// Whether the engine is writing to `list` right now.
    pub fn is_list_updating(&self, list: ListId) -> bool {
        self.ctx.is_list_updating(list)
    }
}

impl<T: Clone + PartialEq + 'static> Default for SyncEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SyncEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("options", &self.ctx.options)
            .field("bindings", &self.ctx.bindings.borrow().len())
            .field("lists_updating", &self.ctx.lists_updating.borrow().len())
            .field("controls_updating", &self.ctx.controls_updating.borrow().len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
