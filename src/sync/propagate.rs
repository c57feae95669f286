// ============================================================================
// spark-selection - Propagation
// The two directions of a binding and the handlers that drive them
// ============================================================================
//
// list -> control: an external list reported a change; mirror it into the
//                  control's native selection while the control is guarded.
// control -> list: a control's selection changed; mirror the removed and
//                  added groups into the bound list while the list is guarded.
//
// Each handler first checks the guard of its own source. A write the engine
// made itself fires the opposite event synchronously; that event finds its
// source guarded and returns without propagating, which breaks the cycle.
// ============================================================================

use std::rc::{Rc, Weak};

use log::{debug, trace};

use super::context::SyncContext;
use crate::collections::{ExternalList, NativeSelection};
use crate::controls::{CapabilityFn, SelectionAdapter, still_capable};
use crate::core::types::{
    ControlId, ListChange, ListChangeHandler, ListId, SelectionChanged, SelectionChangedHandler,
};
use crate::error::{Result, SyncError};

// =============================================================================
// LIST -> CONTROL
// =============================================================================

/// Mirror one list change into a control's native selection.
///
/// Unsupported change kinds fail before the control is guarded or touched,
/// so the selection stays exactly as it was when the notification arrived.
pub(crate) fn list_to_control<T: Clone + PartialEq + 'static>(
    ctx: &SyncContext<T>,
    control: ControlId,
    selection: &NativeSelection<T>,
    list: &dyn ExternalList<T>,
    change: &ListChange<T>,
) -> Result<()> {
    match change {
        ListChange::Insert { items, .. } => {
            let _guard = ctx.guard_control(control);
            trace!("{} -> {control}: insert {} item(s)", list.list_id(), items.len());
            selection.extend(items.iter().cloned())
        }
        ListChange::Remove { items, .. } => {
            let _guard = ctx.guard_control(control);
            trace!("{} -> {control}: remove {} item(s)", list.list_id(), items.len());
            for item in items {
                selection.remove(item)?;
            }
            Ok(())
        }
        ListChange::Reset => {
            let _guard = ctx.guard_control(control);
            let items = list.to_vec();
            trace!("{} -> {control}: reset to {} item(s)", list.list_id(), items.len());
            selection.clear()?;
            selection.extend(items)
        }
        ListChange::Replace { .. } | ListChange::Move { .. } => {
            let kind = change.kind();
            debug!("{} reported unsupported change `{kind}` for {control}", list.list_id());
            Err(SyncError::UnsupportedChange { kind })
        }
    }
}

/// Build the handler registered with a bound list's change feed.
///
/// Writes the list receives from this same control's selection changes are
/// skipped. Writes made on behalf of another control bound to the same list
/// are mirrored like any other change.
pub(crate) fn list_change_handler<T: Clone + PartialEq + 'static>(
    ctx: Weak<SyncContext<T>>,
    adapter: SelectionAdapter<T>,
    list_id: ListId,
    list: Weak<dyn ExternalList<T>>,
) -> ListChangeHandler<T> {
    Rc::new(move |change: &ListChange<T>| {
        let Some(ctx) = ctx.upgrade() else {
            return Ok(());
        };
        let control = adapter.identity();
        if !adapter.is_capable() {
            debug!("{control} lost its multi-item selection, detaching from {list_id}");
            ctx.release(control);
            return Ok(());
        }
        if ctx.is_list_updating_for(list_id, control) {
            trace!("{list_id} change `{}` caused by {control}, suppressed", change.kind());
            return Ok(());
        }
        let Some(list) = list.upgrade() else {
            return Ok(());
        };
        list_to_control(
            &ctx,
            control,
            adapter.native_selection(),
            list.as_ref(),
            change,
        )
    })
}

// =============================================================================
// CONTROL -> LIST
// =============================================================================

/// Mirror one selection-changed event into the bound list: removals first,
/// then additions in the order the event reports them.
pub(crate) fn control_to_list<T: Clone + PartialEq + 'static>(
    ctx: &SyncContext<T>,
    control: ControlId,
    list: &dyn ExternalList<T>,
    change: &SelectionChanged<T>,
) -> Result<()> {
    let _guard = ctx.guard_list(list.list_id(), control);
    trace!(
        "{control} -> {}: remove {}, add {}",
        list.list_id(),
        change.removed.len(),
        change.added.len()
    );
    for item in &change.removed {
        list.remove_item(item)?;
    }
    for item in &change.added {
        list.push(item.clone())?;
    }
    Ok(())
}

/// Build the handler registered with a control's selection-changed event.
///
/// The handler resolves the bound list on every event, so it is a no-op while
/// the control has no binding and follows rebinding without resubscribing.
/// It holds the capability check rather than the adapter, since the adapter
/// owns the selection this handler is registered with.
pub(crate) fn selection_changed_handler<T: Clone + PartialEq + 'static>(
    ctx: Weak<SyncContext<T>>,
    control: ControlId,
    capability: Option<CapabilityFn>,
) -> SelectionChangedHandler<T> {
    Rc::new(move |change: &SelectionChanged<T>| {
        let Some(ctx) = ctx.upgrade() else {
            return Ok(());
        };
        if !still_capable(capability.as_ref()) {
            debug!("{control} lost its multi-item selection, detaching");
            ctx.release(control);
            return Ok(());
        }
        if ctx.is_control_updating(control) {
            trace!("{control} selection change caused by engine, suppressed");
            return Ok(());
        }
        let Some(list) = ctx.mirror_target(control) else {
            trace!("{control} selection changed with no bound list");
            return Ok(());
        };
        control_to_list(&ctx, control, list.as_ref(), change)
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::{ObservableVec, PlainList};
    use crate::core::types::ChangeKind;
    use crate::sync::options::SyncOptions;

    fn ctx() -> SyncContext<&'static str> {
        SyncContext::new(SyncOptions::default())
    }

    #[test]
    fn insert_appends_to_selection() {
        let ctx = ctx();
        let control = ControlId::next();
        let selection = NativeSelection::new();
        selection.push("a").unwrap();
        let list = PlainList::from_vec(vec!["x", "a"]);

        let change = ListChange::Insert {
            index: 0,
            items: vec!["x"],
        };
        list_to_control(&ctx, control, &selection, &list, &change).unwrap();

        assert_eq!(selection.items(), vec!["a", "x"]);
        assert!(!ctx.is_control_updating(control));
    }

    #[test]
    fn remove_and_reset() {
        let ctx = ctx();
        let control = ControlId::next();
        let selection = NativeSelection::new();
        selection.extend(["a", "b", "c"]).unwrap();
        let list = PlainList::from_vec(vec!["c", "d"]);

        let change = ListChange::Remove {
            index: 0,
            items: vec!["a", "b"],
        };
        list_to_control(&ctx, control, &selection, &list, &change).unwrap();
        assert_eq!(selection.items(), vec!["c"]);

        list_to_control(&ctx, control, &selection, &list, &ListChange::Reset).unwrap();
        assert_eq!(selection.items(), vec!["c", "d"]);
    }

    #[test]
    fn control_is_guarded_while_writing() {
        let ctx = Rc::new(ctx());
        let control = ControlId::next();
        let selection = NativeSelection::new();
        let list = PlainList::new();

        let seen = Rc::new(std::cell::Cell::new(false));
        let seen_clone = seen.clone();
        let weak = Rc::downgrade(&ctx);
        let _sub = selection.subscribe(move |_| {
            let ctx = weak.upgrade().unwrap();
            seen_clone.set(ctx.is_control_updating(control));
            Ok(())
        });

        let change = ListChange::Insert {
            index: 0,
            items: vec!["a"],
        };
        list_to_control(&ctx, control, &selection, &list, &change).unwrap();

        assert!(seen.get());
        assert!(!ctx.is_control_updating(control));
    }

    #[test]
    fn unsupported_kinds_touch_nothing() {
        let ctx = ctx();
        let control = ControlId::next();
        let selection = NativeSelection::new();
        selection.push("a").unwrap();
        let list = PlainList::from_vec(vec!["b"]);

        let change = ListChange::Replace {
            index: 0,
            old: vec!["a"],
            new: vec!["b"],
        };
        let err = list_to_control(&ctx, control, &selection, &list, &change).unwrap_err();

        assert_eq!(
            err,
            SyncError::UnsupportedChange {
                kind: ChangeKind::Replace
            }
        );
        assert_eq!(selection.items(), vec!["a"]);
        assert!(!ctx.is_control_updating(control));
    }

    #[test]
    fn control_to_list_removes_then_appends() {
        let ctx = ctx();
        let control = ControlId::next();
        let list = ObservableVec::from_vec(vec!["b", "x"]);

        let change = SelectionChanged::new(vec!["b"], vec!["y"]);
        control_to_list(&ctx, control, &list, &change).unwrap();

        assert_eq!(list.to_vec(), vec!["x", "y"]);
        assert!(!ctx.is_list_updating(list.id()));
    }

    #[test]
    fn list_handler_skips_only_its_own_writes() {
        let ctx = Rc::new(ctx());
        let list = ObservableVec::<&'static str>::new();
        let shared = list.shared();
        let writer = ControlId::next();
        let writer_selection = NativeSelection::new();
        let bystander = ControlId::next();
        let bystander_selection = NativeSelection::new();

        let on_writer = list_change_handler(
            Rc::downgrade(&ctx),
            SelectionAdapter::new(writer, writer_selection.clone()),
            list.id(),
            Rc::downgrade(&shared),
        );
        let on_bystander = list_change_handler(
            Rc::downgrade(&ctx),
            SelectionAdapter::new(bystander, bystander_selection.clone()),
            list.id(),
            Rc::downgrade(&shared),
        );

        let insert = ListChange::Insert {
            index: 0,
            items: vec!["a"],
        };
        let guard = ctx.guard_list(list.id(), writer);
        on_writer(&insert).unwrap();
        on_bystander(&insert).unwrap();
        drop(guard);

        assert!(writer_selection.is_empty());
        assert_eq!(bystander_selection.items(), vec!["a"]);
    }

    #[test]
    fn handlers_are_inert_after_context_drop() {
        let ctx = Rc::new(ctx());
        let control = ControlId::next();
        let list = ObservableVec::<&'static str>::new();
        let shared = list.shared();
        let selection = NativeSelection::new();

        let on_list = list_change_handler(
            Rc::downgrade(&ctx),
            SelectionAdapter::new(control, selection.clone()),
            list.id(),
            Rc::downgrade(&shared),
        );
        let on_selection = selection_changed_handler(Rc::downgrade(&ctx), control, None);
        drop(ctx);

        let insert = ListChange::Insert {
            index: 0,
            items: vec!["a"],
        };
        on_list(&insert).unwrap();
        on_selection(&SelectionChanged::added(vec!["a"])).unwrap();

        assert!(selection.is_empty());
        assert!(list.is_empty());
    }
}
