//! Terminal rendering for the list and detail views.
//!
//! Presentation only: everything shown here is derived from the core's
//! view-models, and feature toggles decide which affordances appear.

use chrono::{DateTime, Utc};
use partnerbox_core::{InboxView, Message, PartnerConfig, Selection};

/// Format a message date the way the list column shows it, e.g. "Jan 4".
fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d").to_string()
}

/// Render the inbox list for a partner.
pub fn list(partner: &PartnerConfig, view: &InboxView<'_>, selection: &Selection) {
    println!();
    println!(
        "== {} ({}) - theme: {} ==",
        partner.name,
        partner.id,
        partner.theme.token()
    );

    if view.is_empty() {
        println!("  No messages match your search.");
    }

    for message in &view.messages {
        let checked = if selection.contains(&message.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let unread = if message.is_read { " " } else { "*" };
        let spam = if message.is_spam { " [SPAM]" } else { "" };

        println!(
            "  {checked} {unread} {:>3}  {:<22} {}{spam}  ({})",
            message.id,
            truncate(&message.sender, 22),
            truncate(&message.subject, 44),
            short_date(&message.date),
        );
        if partner.features.preview_snippet
            && let Some(snippet) = &message.snippet
        {
            println!("             {}", truncate(snippet, 64));
        }
    }

    println!(
        "  -- {} selected · {} messages",
        selection.len(),
        view.total_count
    );
}

/// Render the detail view for a resolved message.
pub fn detail(message: &Message, reply_open: bool, reply_text: &str) {
    println!();
    println!("Subject: {}", message.subject);
    println!(
        "From:    {} · {}",
        message.sender,
        message.date.format("%a, %d %b %Y %H:%M")
    );
    let mut flags = Vec::new();
    if message.is_read {
        flags.push("read");
    } else {
        flags.push("unread");
    }
    if message.is_spam {
        flags.push("spam");
    }
    println!("Flags:   {}", flags.join(", "));
    println!();
    println!("{}", message.body.as_deref().unwrap_or("(no body)"));
    if reply_open {
        println!();
        println!("--- reply draft ({} chars) ---", reply_text.len());
        println!("{reply_text}");
    }
}

/// Render the not-found state for a detail view.
pub fn not_found(id: &str) {
    println!("Email {id} not found in this partner inbox.");
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
