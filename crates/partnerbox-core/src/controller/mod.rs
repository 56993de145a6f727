//! View controllers for the list and detail views.
//!
//! Each controller mounts independently: it opens its own mailbox store
//! handle, subscribes to the write broadcast, and coordinates with other
//! mounted views only through the durable layer plus that broadcast.

mod detail;
mod list;

pub use detail::DetailController;
pub use list::ListController;
