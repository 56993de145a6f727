//! Mailbox store: the single source of truth for one partner's mailbox.
//!
//! Reconciles the bundled fixture seed, the persisted snapshot, and live
//! mutations. Persistence is best-effort: a failed write is logged and the
//! in-memory snapshot keeps the mutation, trading durability for UI
//! responsiveness.

use std::sync::Arc;

use tracing::{debug, warn};

use super::fixture;
use super::model::{Message, MessageId};
use crate::partner::PartnerId;
use crate::storage::MailboxRepository;

/// The authoritative in-memory mailbox for one partner during a session.
///
/// Exclusively owns its snapshot; views read derived copies and never hold a
/// reference into it. Dropped (and replaced) when the active partner changes.
pub struct MailboxStore {
    partner: PartnerId,
    repository: Arc<MailboxRepository>,
    snapshot: Vec<Message>,
}

impl MailboxStore {
    /// Open the mailbox for a partner, running the load protocol.
    ///
    /// The persisted snapshot becomes the working snapshot when non-empty.
    /// Otherwise the bundled fixture dataset is used and immediately
    /// persisted, so subsequent loads for this partner see it without
    /// re-seeding.
    pub async fn open(partner: PartnerId, repository: Arc<MailboxRepository>) -> Self {
        let persisted = repository.load(&partner).await;
        let needs_seed = persisted.is_empty();
        let snapshot = if needs_seed {
            debug!(%partner, "seeding mailbox from bundled fixture");
            fixture::bundled_messages().to_vec()
        } else {
            persisted
        };

        let store = Self {
            partner,
            repository,
            snapshot,
        };
        if needs_seed {
            store.persist().await;
        }
        store
    }

    /// The partner this store belongs to.
    #[must_use]
    pub fn partner(&self) -> &PartnerId {
        &self.partner
    }

    /// The durable key this store reads and writes.
    #[must_use]
    pub fn key(&self) -> String {
        MailboxRepository::mailbox_key(&self.partner)
    }

    /// The current snapshot, in mailbox order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.snapshot
    }

    /// Re-read the snapshot from the durable layer.
    ///
    /// Used on change notifications: the subscriber must never trust another
    /// subscriber's in-memory state. Unlike [`open`](Self::open), this does
    /// not re-seed an empty mailbox.
    pub async fn reload(&mut self) {
        self.snapshot = self.repository.load(&self.partner).await;
    }

    /// Resolve a single message by id for detail viewing.
    ///
    /// Searches the persisted mailbox first and falls back to the bundled
    /// fixture; a fixture hit is merged into the mailbox and persisted. As a
    /// side effect of viewing, an unread message is marked read and the
    /// change persisted before it is returned. Returns `None` when the id
    /// exists in neither place.
    pub async fn resolve(&mut self, id: &MessageId) -> Option<Message> {
        if let Some(pos) = self.position(id) {
            if !self.snapshot[pos].is_read {
                self.snapshot[pos].is_read = true;
                self.persist().await;
            }
            return Some(self.snapshot[pos].clone());
        }

        let mut message = fixture::bundled_message(id)?.clone();
        message.is_read = true;
        debug!(partner = %self.partner, %id, "merging fixture message into mailbox");

        // Append if absent, replace if present; the id check above already
        // ruled out "present", so this is an append.
        self.snapshot.push(message.clone());
        self.persist().await;
        Some(message)
    }

    /// Set the read flag on every listed message present in the mailbox.
    ///
    /// Absent ids are silently ignored; an empty id set is a no-op.
    pub async fn set_read(&mut self, ids: &[MessageId], read: bool) {
        if ids.is_empty() {
            return;
        }
        for message in &mut self.snapshot {
            if ids.contains(&message.id) {
                message.is_read = read;
            }
        }
        self.persist().await;
    }

    /// Mark every listed message present in the mailbox as spam.
    ///
    /// One-directional: there is no bulk "unspam". Absent ids are silently
    /// ignored; an empty id set is a no-op.
    pub async fn set_spam(&mut self, ids: &[MessageId]) {
        if ids.is_empty() {
            return;
        }
        for message in &mut self.snapshot {
            if ids.contains(&message.id) {
                message.is_spam = true;
            }
        }
        self.persist().await;
    }

    /// Flip the read flag of a single message. Absent ids are ignored.
    pub async fn toggle_read(&mut self, id: &MessageId) {
        if let Some(pos) = self.position(id) {
            self.snapshot[pos].is_read = !self.snapshot[pos].is_read;
            self.persist().await;
        }
    }

    /// Flip the spam flag of a single message. Absent ids are ignored.
    pub async fn toggle_spam(&mut self, id: &MessageId) {
        if let Some(pos) = self.position(id) {
            self.snapshot[pos].is_spam = !self.snapshot[pos].is_spam;
            self.persist().await;
        }
    }

    /// Remove every listed message from the mailbox.
    ///
    /// If the currently open detail message is among them, navigating away is
    /// the caller's responsibility. An empty id set is a no-op.
    pub async fn delete(&mut self, ids: &[MessageId]) {
        if ids.is_empty() {
            return;
        }
        self.snapshot.retain(|m| !ids.contains(&m.id));
        self.persist().await;
    }

    /// Accept a reply and discard it.
    ///
    /// Replies are not persisted and no sent record is kept; the composer is
    /// closed by the caller.
    pub fn reply(&self, id: &MessageId, text: &str) {
        debug!(partner = %self.partner, %id, chars = text.len(), "reply discarded (no-op send)");
    }

    fn position(&self, id: &MessageId) -> Option<usize> {
        self.snapshot.iter().position(|m| &m.id == id)
    }

    /// Persist the full snapshot, best-effort.
    async fn persist(&self) {
        if let Err(err) = self.repository.save(&self.partner, &self.snapshot).await {
            warn!(
                partner = %self.partner,
                %err,
                "mailbox write failed; keeping in-memory state"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn open_seeded(id: &str) -> (MailboxStore, Arc<MailboxRepository>) {
        let repository = Arc::new(MailboxRepository::in_memory().await.unwrap());
        let store = MailboxStore::open(PartnerId::new(id), Arc::clone(&repository)).await;
        (store, repository)
    }

    fn ids(raw: &[&str]) -> Vec<MessageId> {
        raw.iter().map(|id| MessageId::new(*id)).collect()
    }

    #[tokio::test]
    async fn open_seeds_empty_mailbox_from_fixture() {
        let (store, repository) = open_seeded("partnerA").await;

        assert_eq!(store.messages(), fixture::bundled_messages());
        // Seeding persisted the fixture, so a fresh load sees it.
        let persisted = repository.load(&PartnerId::new("partnerA")).await;
        assert_eq!(persisted, fixture::bundled_messages());
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (first, repository) = open_seeded("partnerA").await;
        let second = MailboxStore::open(PartnerId::new("partnerA"), repository).await;

        assert_eq!(first.messages(), second.messages());
        assert_eq!(second.messages(), fixture::bundled_messages());
    }

    #[tokio::test]
    async fn open_prefers_persisted_state_over_fixture() {
        let repository = Arc::new(MailboxRepository::in_memory().await.unwrap());
        let partner = PartnerId::new("partnerA");
        let edited = fixture::bundled_messages()[..4].to_vec();
        repository.save(&partner, &edited).await.unwrap();

        let store = MailboxStore::open(partner, repository).await;
        assert_eq!(store.messages(), edited);
    }

    #[tokio::test]
    async fn resolve_marks_unread_message_read_and_persists() {
        let (mut store, repository) = open_seeded("partnerA").await;

        let message = store.resolve(&MessageId::new("1")).await.unwrap();
        assert!(message.is_read);

        let persisted = repository.load(&PartnerId::new("partnerA")).await;
        let stored = persisted.iter().find(|m| m.id.as_str() == "1").unwrap();
        assert!(stored.is_read);
    }

    #[tokio::test]
    async fn resolve_does_not_rewrite_already_read_message() {
        let (mut store, _repository) = open_seeded("partnerA").await;

        // id "3" is read in the fixture
        let message = store.resolve(&MessageId::new("3")).await.unwrap();
        assert!(message.is_read);
        assert_eq!(store.messages().len(), fixture::bundled_messages().len());
    }

    #[tokio::test]
    async fn resolve_merges_fixture_message_missing_from_persisted_state() {
        let repository = Arc::new(MailboxRepository::in_memory().await.unwrap());
        let partner = PartnerId::new("partnerA");
        // Persisted state that lost message "8".
        let partial: Vec<Message> = fixture::bundled_messages()
            .iter()
            .filter(|m| m.id.as_str() != "8")
            .cloned()
            .collect();
        repository.save(&partner, &partial).await.unwrap();

        let mut store = MailboxStore::open(partner.clone(), Arc::clone(&repository)).await;
        let message = store.resolve(&MessageId::new("8")).await.unwrap();
        assert!(message.is_read);

        // The fixture hit was appended and persisted.
        let persisted = repository.load(&partner).await;
        assert_eq!(persisted.len(), fixture::bundled_messages().len());
        assert!(persisted.iter().any(|m| m.id.as_str() == "8"));
    }

    #[tokio::test]
    async fn resolve_unknown_id_is_not_found() {
        let (mut store, _repository) = open_seeded("partnerA").await;
        assert!(store.resolve(&MessageId::new("999")).await.is_none());
        assert_eq!(store.messages().len(), fixture::bundled_messages().len());
    }

    #[tokio::test]
    async fn set_read_updates_only_listed_messages() {
        let (mut store, _repository) = open_seeded("partnerA").await;

        store.set_read(&ids(&["1", "2", "6"]), true).await;

        for message in store.messages() {
            match message.id.as_str() {
                "1" | "2" | "6" => assert!(message.is_read),
                other => {
                    let fixture_flag = fixture::bundled_message(&MessageId::new(other))
                        .unwrap()
                        .is_read;
                    assert_eq!(message.is_read, fixture_flag);
                }
            }
        }
    }

    #[tokio::test]
    async fn set_read_ignores_absent_ids() {
        let (mut store, _repository) = open_seeded("partnerA").await;
        store.set_read(&ids(&["1", "does-not-exist"]), true).await;
        assert!(store.messages()[0].is_read);
        assert_eq!(store.messages().len(), fixture::bundled_messages().len());
    }

    #[tokio::test]
    async fn set_spam_is_one_directional() {
        let (mut store, _repository) = open_seeded("partnerA").await;

        store.set_spam(&ids(&["1"])).await;
        assert!(store.messages()[0].is_spam);

        // A second bulk pass never clears the flag.
        store.set_spam(&ids(&["1"])).await;
        assert!(store.messages()[0].is_spam);
    }

    #[tokio::test]
    async fn toggle_read_flips_flag() {
        let (mut store, _repository) = open_seeded("partnerA").await;
        let id = MessageId::new("1");

        store.toggle_read(&id).await;
        assert!(store.messages()[0].is_read);
        store.toggle_read(&id).await;
        assert!(!store.messages()[0].is_read);
    }

    #[tokio::test]
    async fn toggle_spam_flips_flag() {
        let (mut store, _repository) = open_seeded("partnerA").await;
        let id = MessageId::new("7");

        // id "7" starts as spam in the fixture; the detail view can unspam it.
        store.toggle_spam(&id).await;
        let message = store.messages().iter().find(|m| m.id == id).unwrap();
        assert!(!message.is_spam);
    }

    #[tokio::test]
    async fn delete_removes_and_survives_reload() {
        let (mut store, repository) = open_seeded("partnerA").await;

        store.delete(&ids(&["1"])).await;
        assert_eq!(store.messages().len(), 9);
        assert!(store.messages().iter().all(|m| m.id.as_str() != "1"));

        let persisted = repository.load(&PartnerId::new("partnerA")).await;
        assert_eq!(persisted.len(), 9);
    }

    #[tokio::test]
    async fn mutations_never_duplicate_ids() {
        let (mut store, _repository) = open_seeded("partnerA").await;

        store.set_read(&ids(&["1", "2"]), true).await;
        store.set_spam(&ids(&["2", "3"])).await;
        store.delete(&ids(&["4"])).await;
        store.resolve(&MessageId::new("5")).await.unwrap();
        store.toggle_read(&MessageId::new("6")).await;

        let mut seen: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
        seen.sort_unstable();
        let before = seen.len();
        seen.dedup();
        assert_eq!(seen.len(), before);
    }

    #[tokio::test]
    async fn failed_write_keeps_in_memory_mutation() {
        let (mut store, repository) = open_seeded("partnerA").await;
        repository.disable_writes().await;

        store.set_read(&ids(&["1"]), true).await;
        assert!(store.messages()[0].is_read);

        // The durable layer still holds the pre-mutation snapshot.
        let persisted = repository.load(&PartnerId::new("partnerA")).await;
        let stored = persisted.iter().find(|m| m.id.as_str() == "1").unwrap();
        assert!(!stored.is_read);

        // Re-reading the durable layer drops the unpersisted mutation.
        store.reload().await;
        assert!(!store.messages()[0].is_read);
    }

    #[tokio::test]
    async fn partner_mailboxes_are_isolated() {
        let repository = Arc::new(MailboxRepository::in_memory().await.unwrap());
        let mut store_a =
            MailboxStore::open(PartnerId::new("partnerA"), Arc::clone(&repository)).await;
        let store_b =
            MailboxStore::open(PartnerId::new("partnerB"), Arc::clone(&repository)).await;

        store_a.delete(&ids(&["1", "2", "3"])).await;

        assert_eq!(store_b.messages().len(), fixture::bundled_messages().len());
        let persisted_b = repository.load(&PartnerId::new("partnerB")).await;
        assert_eq!(persisted_b.len(), fixture::bundled_messages().len());
    }

    #[tokio::test]
    async fn reload_reads_durable_layer() {
        let (mut store, repository) = open_seeded("partnerA").await;

        // Another writer overwrites the durable snapshot behind our back.
        let edited = fixture::bundled_messages()[..2].to_vec();
        repository
            .save(&PartnerId::new("partnerA"), &edited)
            .await
            .unwrap();

        store.reload().await;
        assert_eq!(store.messages(), edited);
    }

    #[tokio::test]
    async fn reply_mutates_nothing() {
        let (mut store, repository) = open_seeded("partnerA").await;
        let before = store.messages().to_vec();

        store.reply(&MessageId::new("1"), "thanks, got it!");

        assert_eq!(store.messages(), before);
        store.reload().await;
        assert_eq!(store.messages(), before);
        assert_eq!(repository.load(&PartnerId::new("partnerA")).await, before);
    }
}
