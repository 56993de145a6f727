//! Derived view-model state: search filtering and selection.

mod projection;
mod selection;

pub use projection::{InboxView, project, toggle_select_all};
pub use selection::Selection;
