//! View-model projection for the list view.
//!
//! A pure function of (mailbox snapshot, search text, selection set). The
//! filter never re-sorts: the projected sequence keeps the mailbox's own
//! insertion order.

use crate::mailbox::{Message, MessageId};

use super::selection::Selection;

/// Derived list view-model: the filtered messages plus selection summary.
#[derive(Debug)]
pub struct InboxView<'a> {
    /// Messages matching the search text, in mailbox order.
    pub messages: Vec<&'a Message>,
    /// Total message count before filtering.
    pub total_count: usize,
    /// Every currently visible id is selected (and something is visible).
    pub all_visible_selected: bool,
    /// At least one visible id is selected, but not all of them.
    pub some_visible_selected: bool,
}

impl InboxView<'_> {
    /// Whether the filter matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The visible message ids, in mailbox order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|m| m.id.clone()).collect()
    }
}

/// Case-insensitive substring match against sender, subject, and snippet.
///
/// A missing snippet is treated as the empty string; a blank query matches
/// everything.
fn matches_query(message: &Message, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    message.sender.to_lowercase().contains(&q)
        || message.subject.to_lowercase().contains(&q)
        || message.snippet_text().to_lowercase().contains(&q)
}

/// Project the mailbox snapshot into the list view-model.
#[must_use]
pub fn project<'a>(messages: &'a [Message], query: &str, selection: &Selection) -> InboxView<'a> {
    let visible: Vec<&Message> = messages.iter().filter(|m| matches_query(m, query)).collect();

    let all_visible_selected =
        !visible.is_empty() && visible.iter().all(|m| selection.contains(&m.id));
    let some_visible_selected =
        !all_visible_selected && visible.iter().any(|m| selection.contains(&m.id));

    InboxView {
        messages: visible,
        total_count: messages.len(),
        all_visible_selected,
        some_visible_selected,
    }
}

/// Toggle "select all" over the currently visible ids.
///
/// When every visible id is already selected, exactly the visible ids are
/// removed; ids outside the current filter stay selected, so "select all of
/// this search result" never loses other selections. Otherwise exactly the
/// visible ids are added.
pub fn toggle_select_all(selection: &mut Selection, visible_ids: &[MessageId]) {
    let all_selected =
        !visible_ids.is_empty() && visible_ids.iter().all(|id| selection.contains(id));

    if all_selected {
        selection.remove_ids(visible_ids);
    } else {
        for id in visible_ids {
            selection.insert(id.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mailbox::fixture::bundled_messages;

    fn id(raw: &str) -> MessageId {
        MessageId::new(raw)
    }

    #[test]
    fn blank_query_matches_everything_in_order() {
        let messages = bundled_messages();
        let view = project(messages, "", &Selection::new());

        assert_eq!(view.messages.len(), messages.len());
        assert_eq!(view.total_count, messages.len());
        let order: Vec<&str> = view.messages.iter().map(|m| m.id.as_str()).collect();
        let expected: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn filter_is_case_insensitive_on_sender() {
        let view = project(bundled_messages(), "netflix", &Selection::new());
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].sender, "Netflix");
    }

    #[test]
    fn filter_matches_subject_and_snippet() {
        let by_subject = project(bundled_messages(), "invoice", &Selection::new());
        assert!(by_subject.messages.iter().any(|m| m.id.as_str() == "1"));

        let by_snippet = project(bundled_messages(), "lisbon", &Selection::new());
        assert_eq!(by_snippet.messages.len(), 1);
        assert_eq!(by_snippet.messages[0].id.as_str(), "8");
    }

    #[test]
    fn unmatched_query_yields_empty_view() {
        let view = project(bundled_messages(), "non-existing-query", &Selection::new());
        assert!(view.is_empty());
        assert!(!view.all_visible_selected);
        assert!(!view.some_visible_selected);
    }

    #[test]
    fn selection_summary_flags() {
        let mut selection = Selection::new();
        selection.insert(id("1"));

        let view = project(bundled_messages(), "", &selection);
        assert!(!view.all_visible_selected);
        assert!(view.some_visible_selected);

        for message in bundled_messages() {
            selection.insert(message.id.clone());
        }
        let view = project(bundled_messages(), "", &selection);
        assert!(view.all_visible_selected);
        assert!(!view.some_visible_selected);
    }

    #[test]
    fn all_visible_selected_requires_non_empty_filter() {
        let view = project(bundled_messages(), "zzz-no-match", &Selection::new());
        assert!(!view.all_visible_selected);
    }

    #[test]
    fn select_all_under_filter_targets_only_visible_ids() {
        let mut selection = Selection::new();
        // An out-of-filter selection that must survive the round trip.
        selection.insert(id("10"));

        // "github" narrows to message "2" only.
        let visible = project(bundled_messages(), "github", &selection).visible_ids();
        assert_eq!(visible, vec![id("2")]);

        toggle_select_all(&mut selection, &visible);
        assert!(selection.contains(&id("2")));
        assert!(selection.contains(&id("10")));

        toggle_select_all(&mut selection, &visible);
        assert!(!selection.contains(&id("2")));
        assert!(selection.contains(&id("10")));
    }

    #[test]
    fn select_all_with_empty_visible_set_selects_nothing() {
        let mut selection = Selection::new();
        toggle_select_all(&mut selection, &[]);
        assert!(selection.is_empty());
    }
}
