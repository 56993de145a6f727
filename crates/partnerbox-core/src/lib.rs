//! # partnerbox-core
//!
//! Core engine for `Partnerbox`, a multi-tenant ("partner") email inbox demo.
//!
//! This crate provides:
//! - Partner registry (per-tenant feature toggles and theme tokens)
//! - Durable per-partner mailbox storage over a `SQLite` key-value table
//! - The mailbox store: seeding from bundled fixture data, single-message
//!   resolution with read-on-open, and bulk mutations
//! - Change-notification broadcast keeping independently mounted views
//!   consistent without shared in-memory state
//! - View-model projection (search filtering and selection summaries)
//! - List and detail view controllers
//!
//! All data lives locally; there is no network transport.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod controller;
mod error;
pub mod mailbox;
pub mod partner;
pub mod storage;
pub mod view_model;

pub use controller::{DetailController, ListController};
pub use error::{Error, Result};
pub use mailbox::{MailboxStore, Message, MessageId};
pub use partner::{PartnerConfig, PartnerFeatures, PartnerId, PartnerRegistry, Theme};
pub use storage::{EventBus, MailboxEvent, MailboxRepository};
pub use view_model::{InboxView, Selection, project, toggle_select_all};
