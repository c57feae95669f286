// ============================================================================
// spark-selection - Controls
// Elements the engine can bind, seen through the SelectionAdapter capability
// ============================================================================

mod adapter;
mod data_grid;
mod list_box;
mod text_block;

pub use adapter::{Element, SelectionAdapter};
pub(crate) use adapter::{CapabilityFn, still_capable};
pub use data_grid::DataGrid;
pub use list_box::{ListBox, SelectionMode};
pub use text_block::TextBlock;
