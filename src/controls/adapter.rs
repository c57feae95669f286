// ============================================================================
// spark-selection - Selection Adapter
// One capability surface over every kind of selection-capable control
// ============================================================================
//
// The engine never matches on concrete control types. It asks an element for
// a SelectionAdapter and either gets one (identity + native selection) or
// gets None and skips the element. Supporting a new kind of control means
// implementing `Element::selection_adapter` for it; the engine is untouched.
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::collections::NativeSelection;
use crate::core::types::ControlId;

// =============================================================================
// ELEMENT
// =============================================================================

/// Any UI element the attachment trigger can be pointed at.
pub trait Element<T> {
    /// Stable identity of the element.
    fn control_id(&self) -> ControlId;

    /// Short human-readable kind, e.g. `"ListBox"`.
    fn kind(&self) -> &'static str;

    /// Optional instance name given by the application.
    fn name(&self) -> Option<&str> {
        None
    }

    /// The multi-selection capability, if this element currently has one.
    fn selection_adapter(&self) -> Option<SelectionAdapter<T>> {
        None
    }

    /// Label used in logs and error messages.
    fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("{} '{}' ({})", self.kind(), name, self.control_id()),
            None => format!("{} ({})", self.kind(), self.control_id()),
        }
    }
}

// =============================================================================
// SELECTION ADAPTER
// =============================================================================

/// Re-checks whether a control still offers its multi-item selection.
pub(crate) type CapabilityFn = Rc<dyn Fn() -> bool>;

pub(crate) fn still_capable(capability: Option<&CapabilityFn>) -> bool {
    capability.is_none_or(|check| check())
}

/// A control seen only through its multi-selection capability.
pub struct SelectionAdapter<T> {
    control: ControlId,
    selection: NativeSelection<T>,
    capability: Option<CapabilityFn>,
}

impl<T> Clone for SelectionAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            control: self.control,
            selection: self.selection.clone(),
            capability: self.capability.clone(),
        }
    }
}

impl<T> SelectionAdapter<T> {
    /// Wrap a control's native selection. Used by `Element` implementations.
    pub fn new(control: ControlId, selection: NativeSelection<T>) -> Self {
        Self {
            control,
            selection,
            capability: None,
        }
    }

    /// For controls that can lose multi-selection after handing out the
    /// adapter. The engine consults `still_capable` on every event and
    /// detaches the control once it returns false.
    pub fn with_capability(mut self, still_capable: impl Fn() -> bool + 'static) -> Self {
        self.capability = Some(Rc::new(still_capable));
        self
    }

    /// Whether the control still offers a multi-item selection.
    pub fn is_capable(&self) -> bool {
        still_capable(self.capability.as_ref())
    }

    pub(crate) fn capability(&self) -> Option<CapabilityFn> {
        self.capability.clone()
    }

    /// Adapter for `element`, or `None` when it cannot hold a multi-item
    /// selection.
    pub fn for_element(element: &dyn Element<T>) -> Option<Self> {
        element.selection_adapter()
    }

    pub fn identity(&self) -> ControlId {
        self.control
    }

    pub fn native_selection(&self) -> &NativeSelection<T> {
        &self.selection
    }
}

impl<T> fmt::Debug for SelectionAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionAdapter")
            .field("control", &self.control)
            .field("capable", &self.is_capable())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
