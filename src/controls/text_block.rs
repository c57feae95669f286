// ============================================================================
// spark-selection - TextBlock
// ============================================================================

use std::cell::RefCell;

use super::adapter::Element;
use crate::core::types::ControlId;

/// A read-only text element. Has no selection of items.
#[derive(Debug)]
pub struct TextBlock {
    id: ControlId,
    name: Option<String>,
    text: RefCell<String>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ControlId::next(),
            name: None,
            text: RefCell::new(text.into()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }
}

impl<T> Element<T> for TextBlock {
    fn control_id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "TextBlock"
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
