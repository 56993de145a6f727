//! Ephemeral selection state for the list view.

use std::collections::HashSet;

use crate::mailbox::MessageId;

/// The set of message ids currently checked in the list view.
///
/// Never persisted. Reset whenever the active partner changes or the
/// underlying snapshot changes out from under the view, since a selection is
/// not meaningful against a snapshot that moved underneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<MessageId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given id is selected.
    #[must_use]
    pub fn contains(&self, id: &MessageId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip the selected state of a single id.
    pub fn toggle(&mut self, id: &MessageId) {
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Add an id to the selection.
    pub fn insert(&mut self, id: MessageId) {
        self.ids.insert(id);
    }

    /// Remove exactly the given ids, leaving any others selected.
    pub fn remove_ids(&mut self, ids: &[MessageId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    /// Clear the whole selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The selected ids, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<MessageId> {
        self.ids.iter().cloned().collect()
    }
}
