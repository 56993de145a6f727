//! Bundled fixture dataset.
//!
//! An immutable, partner-agnostic seed list of messages. It is used only to
//! initialize a mailbox that has no persisted state yet, and as a fallback
//! when resolving a message id absent from the persisted mailbox.

use std::sync::LazyLock;

use tracing::error;

use super::model::{Message, MessageId};

const SEED_JSON: &str = include_str!("../../data/emails.json");

static BUNDLED: LazyLock<Vec<Message>> = LazyLock::new(|| {
    serde_json::from_str(SEED_JSON).unwrap_or_else(|err| {
        // A broken seed file degrades to an empty mailbox instead of halting.
        error!(%err, "bundled fixture dataset failed to decode");
        Vec::new()
    })
});

/// The bundled seed messages, decoded once per process.
#[must_use]
pub fn bundled_messages() -> &'static [Message] {
    &BUNDLED
}

/// Look up a single bundled message by id.
#[must_use]
pub fn bundled_message(id: &MessageId) -> Option<&'static Message> {
    bundled_messages().iter().find(|m| &m.id == id)
}
