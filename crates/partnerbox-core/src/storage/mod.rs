//! Durable key-value persistence and change-notification broadcast.
//!
//! One durable key per partner (`mailbox:{partnerId}`), JSON value. Writes
//! are full-snapshot overwrites followed by a broadcast carrying the written
//! key, which is how independently mounted views stay consistent without
//! sharing in-memory state.

mod events;
mod repository;

pub use events::{EventBus, MailboxEvent};
pub use repository::MailboxRepository;
