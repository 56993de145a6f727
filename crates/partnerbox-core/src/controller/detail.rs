//! Detail view controller.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

use crate::mailbox::{MailboxStore, Message, MessageId};
use crate::partner::PartnerConfig;
use crate::storage::{MailboxEvent, MailboxRepository};

/// Controller for the single-message detail view.
///
/// Resolves its message on mount (marking it read as a side effect of
/// viewing) and owns the transient reply-composer state. Subscribes to the
/// write broadcast on mount; dropping the controller releases the
/// subscription.
pub struct DetailController {
    partner: PartnerConfig,
    store: MailboxStore,
    events: broadcast::Receiver<MailboxEvent>,
    message_id: MessageId,
    message: Option<Message>,
    reply_draft: Option<String>,
}

impl DetailController {
    /// Mount the detail view for a message id.
    ///
    /// Resolution searches the persisted mailbox first and falls back to the
    /// bundled fixture; an unread message is marked read and persisted before
    /// the view sees it. `message()` stays `None` when the id is unknown.
    pub async fn mount(
        partner: PartnerConfig,
        repository: Arc<MailboxRepository>,
        message_id: MessageId,
    ) -> Self {
        let events = repository.subscribe();
        let mut store = MailboxStore::open(partner.id.clone(), repository).await;
        let message = store.resolve(&message_id).await;
        Self {
            partner,
            store,
            events,
            message_id,
            message,
            reply_draft: None,
        }
    }

    /// The partner this view is mounted for.
    #[must_use]
    pub fn partner(&self) -> &PartnerConfig {
        &self.partner
    }

    /// The resolved message, or `None` for the not-found state (including a
    /// message deleted out from under the view).
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Flip the read flag of the open message.
    pub async fn toggle_read(&mut self) {
        if self.message.is_some() {
            self.store.toggle_read(&self.message_id).await;
            self.refresh_message();
        }
    }

    /// Flip the spam flag of the open message. Unlike the bulk action this
    /// also un-marks spam.
    pub async fn toggle_spam(&mut self) {
        if self.message.is_some() {
            self.store.toggle_spam(&self.message_id).await;
            self.refresh_message();
        }
    }

    /// Delete the open message.
    ///
    /// Returns `true` when a message was actually deleted; the caller is
    /// responsible for navigating away from the now-empty view.
    pub async fn delete(&mut self) -> bool {
        if self.message.is_none() {
            return false;
        }
        self.store.delete(&[self.message_id.clone()]).await;
        self.message = None;
        self.reply_draft = None;
        true
    }

    /// Whether the reply composer is open.
    #[must_use]
    pub fn reply_open(&self) -> bool {
        self.reply_draft.is_some()
    }

    /// Current reply draft text.
    #[must_use]
    pub fn reply_text(&self) -> &str {
        self.reply_draft.as_deref().unwrap_or_default()
    }

    /// Open the reply composer with an empty draft.
    pub fn open_reply(&mut self) {
        if self.message.is_some() {
            self.reply_draft = Some(String::new());
        }
    }

    /// Replace the reply draft text.
    pub fn set_reply_text(&mut self, text: impl Into<String>) {
        if self.reply_draft.is_some() {
            self.reply_draft = Some(text.into());
        }
    }

    /// Close the composer, discarding the draft.
    pub fn cancel_reply(&mut self) {
        self.reply_draft = None;
    }

    /// "Send" the reply: closes the composer and discards the text.
    ///
    /// Nothing is persisted and no sent record is kept.
    pub fn send_reply(&mut self) {
        if let Some(text) = self.reply_draft.take() {
            self.store.reply(&self.message_id, &text);
        }
    }

    /// Drain pending change notifications.
    ///
    /// On a notification for this partner's key the snapshot is re-read from
    /// the durable layer and the open message re-derived from it; the message
    /// becomes `None` if another view deleted it. Returns whether a reload
    /// happened.
    pub async fn process_events(&mut self) -> bool {
        let mut dirty = false;
        loop {
            match self.events.try_recv() {
                Ok(event) if event.key == self.store.key() => dirty = true,
                Ok(_) => {}
                Err(TryRecvError::Lagged(_)) => dirty = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if dirty {
            debug!(
                partner = %self.partner.id,
                id = %self.message_id,
                "detail view reloading after mailbox write"
            );
            self.store.reload().await;
            self.refresh_message();
        }
        dirty
    }

    fn refresh_message(&mut self) {
        self.message = self
            .store
            .messages()
            .iter()
            .find(|m| m.id == self.message_id)
            .cloned();
    }
}
