//! List view controller.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

use crate::mailbox::{MailboxStore, MessageId};
use crate::partner::PartnerConfig;
use crate::storage::{MailboxEvent, MailboxRepository};
use crate::view_model::{InboxView, Selection, project, toggle_select_all};

/// Controller for the inbox list view.
///
/// Owns a mailbox store handle, the transient search text, and the selection
/// set. Subscribes to the write broadcast on mount; dropping the controller
/// releases the subscription on every exit path.
pub struct ListController {
    partner: PartnerConfig,
    repository: Arc<MailboxRepository>,
    store: MailboxStore,
    events: broadcast::Receiver<MailboxEvent>,
    selection: Selection,
    search: String,
}

impl ListController {
    /// Mount the list view for a partner: open its mailbox (seeding if
    /// needed) and subscribe to change notifications.
    pub async fn mount(partner: PartnerConfig, repository: Arc<MailboxRepository>) -> Self {
        let events = repository.subscribe();
        let store = MailboxStore::open(partner.id.clone(), Arc::clone(&repository)).await;
        Self {
            partner,
            repository,
            store,
            events,
            selection: Selection::new(),
            search: String::new(),
        }
    }

    /// The partner this view is mounted for.
    #[must_use]
    pub fn partner(&self) -> &PartnerConfig {
        &self.partner
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Project the current snapshot into the list view-model.
    #[must_use]
    pub fn view(&self) -> InboxView<'_> {
        project(self.store.messages(), &self.search, &self.selection)
    }

    /// Update the search text.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Flip the selected state of one message.
    pub fn toggle_select(&mut self, id: &MessageId) {
        self.selection.toggle(id);
    }

    /// Toggle "select all" over the currently visible (filtered) messages.
    pub fn toggle_select_all(&mut self) {
        let visible = self.view().visible_ids();
        toggle_select_all(&mut self.selection, &visible);
    }

    /// Mark the selected messages read or unread, then clear them from the
    /// selection.
    pub async fn mark_read(&mut self, read: bool) {
        let targets = self.selection.ids();
        self.store.set_read(&targets, read).await;
        self.selection.remove_ids(&targets);
    }

    /// Mark the selected messages as spam, then clear them from the
    /// selection.
    pub async fn mark_spam(&mut self) {
        let targets = self.selection.ids();
        self.store.set_spam(&targets).await;
        self.selection.remove_ids(&targets);
    }

    /// Delete the selected messages, then clear them from the selection.
    pub async fn delete(&mut self) {
        let targets = self.selection.ids();
        self.store.delete(&targets).await;
        self.selection.remove_ids(&targets);
    }

    /// Drain pending change notifications.
    ///
    /// On a notification for this partner's key the snapshot is re-read from
    /// the durable layer and the selection cleared; notifications for other
    /// partners' keys are ignored. Returns whether a reload happened.
    pub async fn process_events(&mut self) -> bool {
        let mut dirty = false;
        loop {
            match self.events.try_recv() {
                Ok(event) if event.key == self.store.key() => dirty = true,
                Ok(_) => {}
                // Missed events collapse into "reload the latest snapshot".
                Err(TryRecvError::Lagged(_)) => dirty = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if dirty {
            debug!(partner = %self.partner.id, "list view reloading after mailbox write");
            self.store.reload().await;
            self.selection.clear();
        }
        dirty
    }

    /// Switch the active partner.
    ///
    /// Drops the previous partner's store, runs the load protocol for the new
    /// one, and resets all transient view state.
    pub async fn switch_partner(&mut self, partner: PartnerConfig) {
        self.store = MailboxStore::open(partner.id.clone(), Arc::clone(&self.repository)).await;
        self.partner = partner;
        self.selection.clear();
        self.search.clear();
    }
}
