// ============================================================================
// spark-selection - ListBox
// ============================================================================

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::adapter::{Element, SelectionAdapter};
use crate::collections::NativeSelection;
use crate::core::types::ControlId;
use crate::error::Result;

/// How many items a list box lets the user select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one item. Not multi-selection capable.
    Single,
    /// Each click toggles one item.
    Multiple,
    /// Click selects, modifier-click extends.
    #[default]
    Extended,
}

impl SelectionMode {
    pub fn allows_multiple(self) -> bool {
        !matches!(self, SelectionMode::Single)
    }
}

/// A vertical list of items with a selection.
///
/// Selection capable while its mode allows more than one selected item.
pub struct ListBox<T> {
    id: ControlId,
    name: Option<String>,
    mode: Rc<Cell<SelectionMode>>,
    selection: NativeSelection<T>,
}

impl<T: Clone + PartialEq + 'static> ListBox<T> {
    pub fn new() -> Self {
        Self {
            id: ControlId::next(),
            name: None,
            mode: Rc::new(Cell::new(SelectionMode::default())),
            selection: NativeSelection::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mode(self, mode: SelectionMode) -> Self {
        self.mode.set(mode);
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode.get()
    }

    /// Change the selection mode. Switching to `Single` trims the selection
    /// down to its first item.
    ///
    /// A list box in `Single` mode is no longer multi-selection capable. An
    /// engine it was attached to detaches it at the next list change,
    /// selection change or engine query, without mirroring the trim.
    pub fn set_mode(&self, mode: SelectionMode) -> Result<()> {
        self.mode.set(mode);
        if !mode.allows_multiple() {
            let extra: Vec<T> = self.selection.items().into_iter().skip(1).collect();
            self.selection.apply(&extra, &[])?;
        }
        Ok(())
    }

    pub fn selection(&self) -> &NativeSelection<T> {
        &self.selection
    }

    pub fn selected_items(&self) -> Vec<T> {
        self.selection.items()
    }

    /// Click on an item: toggles it in `Multiple` mode, makes it the only
    /// selected item otherwise.
    pub fn click(&self, item: T) -> Result<()> {
        match self.mode.get() {
            SelectionMode::Multiple => {
                if self.selection.contains(&item) {
                    self.selection.apply(&[item], &[])
                } else {
                    self.selection.apply(&[], &[item])
                }
            }
            SelectionMode::Single | SelectionMode::Extended => {
                let others: Vec<T> = self
                    .selection
                    .items()
                    .into_iter()
                    .filter(|selected| *selected != item)
                    .collect();
                self.selection.apply(&others, &[item])
            }
        }
    }

    /// Modifier-click: toggles an item without touching the rest. Falls back
    /// to [`ListBox::click`] in `Single` mode.
    pub fn ctrl_click(&self, item: T) -> Result<()> {
        if !self.mode.get().allows_multiple() {
            return self.click(item);
        }
        if self.selection.contains(&item) {
            self.selection.apply(&[item], &[])
        } else {
            self.selection.apply(&[], &[item])
        }
    }
}

impl<T: Clone + PartialEq + 'static> Default for ListBox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> Element<T> for ListBox<T> {
    fn control_id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "ListBox"
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn selection_adapter(&self) -> Option<SelectionAdapter<T>> {
        if !self.mode.get().allows_multiple() {
            return None;
        }
        let mode = Rc::downgrade(&self.mode);
        let adapter = SelectionAdapter::new(self.id, self.selection.clone()).with_capability(
            move || mode.upgrade().is_some_and(|mode| mode.get().allows_multiple()),
        );
        Some(adapter)
    }
}

impl<T: fmt::Debug> fmt::Debug for ListBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBox")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mode", &self.mode.get())
            .field("selection", &self.selection)
            .finish()
    }
}
