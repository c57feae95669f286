// ============================================================================
// spark-selection - DataGrid
// ============================================================================

use std::cell::RefCell;
use std::fmt;

use super::adapter::{Element, SelectionAdapter};
use crate::collections::NativeSelection;
use crate::core::types::ControlId;
use crate::error::Result;

/// A row grid. Always multi-selection capable.
pub struct DataGrid<T> {
    id: ControlId,
    name: Option<String>,
    rows: RefCell<Vec<T>>,
    selection: NativeSelection<T>,
}

impl<T: Clone + PartialEq + 'static> DataGrid<T> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<T>) -> Self {
        Self {
            id: ControlId::next(),
            name: None,
            rows: RefCell::new(rows),
            selection: NativeSelection::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn rows(&self) -> Vec<T> {
        self.rows.borrow().clone()
    }

    /// Replace the rows. Selected items that are no longer rows get
    /// deselected.
    pub fn set_rows(&self, rows: Vec<T>) -> Result<()> {
        let stale: Vec<T> = self
            .selection
            .items()
            .into_iter()
            .filter(|item| !rows.contains(item))
            .collect();
        *self.rows.borrow_mut() = rows;
        self.selection.apply(&stale, &[])
    }

    pub fn selection(&self) -> &NativeSelection<T> {
        &self.selection
    }

    pub fn selected_items(&self) -> Vec<T> {
        self.selection.items()
    }

    /// Select every row.
    pub fn select_all(&self) -> Result<()> {
        let rows = self.rows();
        self.selection.apply(&[], &rows)
    }

    /// Deselect every row.
    pub fn unselect_all(&self) -> Result<()> {
        self.selection.clear()
    }

    /// Shift-click: select rows `start..=end` (in either order) and nothing
    /// else. Out-of-range bounds are clamped.
    pub fn select_range(&self, start: usize, end: usize) -> Result<()> {
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        let range: Vec<T> = {
            let rows = self.rows.borrow();
            if rows.is_empty() {
                Vec::new()
            } else {
                let high = high.min(rows.len() - 1);
                rows.get(low..=high).map(<[T]>::to_vec).unwrap_or_default()
            }
        };
        let outside: Vec<T> = self
            .selection
            .items()
            .into_iter()
            .filter(|item| !range.contains(item))
            .collect();
        self.selection.apply(&outside, &range)
    }
}

impl<T: Clone + PartialEq + 'static> Default for DataGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> Element<T> for DataGrid<T> {
    fn control_id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "DataGrid"
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn selection_adapter(&self) -> Option<SelectionAdapter<T>> {
        Some(SelectionAdapter::new(self.id, self.selection.clone()))
    }
}

impl<T: fmt::Debug> fmt::Debug for DataGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rows", &self.rows.borrow().len())
            .field("selection", &self.selection)
            .finish()
    }
}
