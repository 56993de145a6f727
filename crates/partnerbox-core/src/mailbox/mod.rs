//! Mailbox: message models, bundled seed data, and the per-partner store.

pub mod fixture;
mod model;
mod store;

pub use model::{Message, MessageId};
pub use store::MailboxStore;
