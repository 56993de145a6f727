//! `Partnerbox` - multi-tenant partner inbox demo.
//!
//! A terminal front-end over `partnerbox-core`: a list view and a detail
//! view, mounted side by side, staying consistent purely through the durable
//! store and its write broadcast.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partnerbox_core::{
    DetailController, ListController, MailboxRepository, MessageId, PartnerId, PartnerRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partnerbox=info,partnerbox_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Partnerbox");

    let repository = Arc::new(open_repository().await?);
    let registry = PartnerRegistry::new();
    let partner = registry.default_partner().clone();
    let list = ListController::mount(partner, Arc::clone(&repository)).await;

    let mut session = Session {
        registry,
        repository,
        list,
        detail: None,
    };
    session.run().await
}

/// Open the mailbox repository, either in memory (`--in-memory`) or at the
/// default location under the user data directory.
async fn open_repository() -> Result<MailboxRepository> {
    if std::env::args().any(|arg| arg == "--in-memory") {
        return MailboxRepository::in_memory()
            .await
            .context("opening in-memory mailbox store");
    }

    let dir: PathBuf = dirs::data_dir()
        .context("no user data directory available")?
        .join("partnerbox");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    let path = dir.join("mailboxes.db");
    MailboxRepository::new(&path.to_string_lossy())
        .await
        .with_context(|| format!("opening mailbox store at {}", path.display()))
}

/// Interactive session: one mounted list view and at most one detail view.
struct Session {
    registry: PartnerRegistry,
    repository: Arc<MailboxRepository>,
    list: ListController,
    detail: Option<DetailController>,
}

impl Session {
    async fn run(&mut self) -> Result<()> {
        println!("partnerbox - type 'help' for commands");
        self.show_list();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            // Let both mounted views catch up with any writes first.
            self.propagate().await;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }
            self.dispatch(&line).await;
        }
        Ok(())
    }

    /// Drain broadcast events into every mounted view.
    async fn propagate(&mut self) {
        self.list.process_events().await;
        if let Some(detail) = &mut self.detail {
            detail.process_events().await;
        }
    }

    async fn dispatch(&mut self, line: &str) {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "help" => Self::show_help(),
            "partners" => self.show_partners(),
            "use" => self.switch_partner(rest).await,
            "ls" => self.show_list(),
            "search" => {
                self.list.set_search(rest);
                self.show_list();
            }
            "select" => {
                if rest.is_empty() {
                    println!("usage: select <id>");
                } else {
                    self.list.toggle_select(&MessageId::new(rest));
                    self.show_list();
                }
            }
            "all" => {
                self.list.toggle_select_all();
                self.show_list();
            }
            "read" | "unread" | "spam" | "rm" => self.bulk_action(command).await,
            "open" => self.open_detail(rest).await,
            "back" => {
                // Unmount the detail view.
                self.detail = None;
                self.show_list();
            }
            "toggle-read" | "toggle-spam" | "delete" | "reply" | "send" | "cancel" => {
                self.detail_action(command, rest).await;
            }
            other => println!("unknown command '{other}' - type 'help'"),
        }
    }

    fn show_help() {
        println!(
            "\
list view:
  partners            list partners
  use <partner>       switch the active partner
  ls                  show the inbox
  search <text>       filter by sender/subject/snippet (empty to clear)
  select <id>         toggle selection of one message
  all                 toggle select-all over the visible messages
  read | unread       mark selection read/unread
  spam                mark selection as spam (partner permitting)
  rm                  delete selection
detail view:
  open <id>           open a message (marks it read)
  toggle-read         flip the read flag
  toggle-spam         flip the spam flag
  delete              delete the open message
  reply               open the reply composer
  send <text>         send the reply (demo: discarded)
  cancel              close the composer
  back                return to the list
  quit                exit"
        );
    }

    fn show_partners(&self) {
        let active = self.list.partner().id.clone();
        for partner in self.registry.list() {
            let marker = if partner.id == active { "*" } else { " " };
            println!(
                "{marker} {}  {} (theme: {}, bulk: {}, spam: {}, snippets: {})",
                partner.id,
                partner.name,
                partner.theme.token(),
                partner.features.bulk_toolbar,
                partner.features.mark_as_spam,
                partner.features.preview_snippet,
            );
        }
    }

    fn show_list(&self) {
        render::list(self.list.partner(), &self.list.view(), self.list.selection());
    }

    async fn switch_partner(&mut self, id: &str) {
        if id.is_empty() {
            println!("usage: use <partner>");
            return;
        }
        let partner = self.registry.get(&PartnerId::new(id)).clone();
        // The old detail view does not carry across tenants.
        self.detail = None;
        self.list.switch_partner(partner).await;
        self.show_list();
    }

    async fn bulk_action(&mut self, command: &str) {
        let features = self.list.partner().features;
        if !features.bulk_toolbar {
            println!("bulk actions are disabled for this partner");
            return;
        }
        if self.list.selection().is_empty() {
            println!("nothing selected");
            return;
        }
        match command {
            "read" => self.list.mark_read(true).await,
            "unread" => self.list.mark_read(false).await,
            "spam" => {
                if features.mark_as_spam {
                    self.list.mark_spam().await;
                } else {
                    println!("'mark as spam' is not available for this partner");
                    return;
                }
            }
            _ => self.list.delete().await,
        }
        self.propagate().await;
        self.show_list();
    }

    async fn open_detail(&mut self, id: &str) {
        if id.is_empty() {
            println!("usage: open <id>");
            return;
        }
        let detail = DetailController::mount(
            self.list.partner().clone(),
            Arc::clone(&self.repository),
            MessageId::new(id),
        )
        .await;
        match detail.message() {
            Some(message) => render::detail(message, detail.reply_open(), detail.reply_text()),
            None => render::not_found(id),
        }
        self.detail = Some(detail);
    }

    async fn detail_action(&mut self, command: &str, rest: &str) {
        if self.detail.is_none() {
            println!("no message open - use 'open <id>' first");
            return;
        }

        if command == "delete" {
            let deleted = match self.detail.as_mut() {
                Some(detail) => detail.delete().await,
                None => false,
            };
            if deleted {
                // The store never navigates; leaving the view is ours.
                self.detail = None;
                self.propagate().await;
                self.show_list();
            }
            return;
        }

        if let Some(detail) = self.detail.as_mut() {
            match command {
                "toggle-read" => detail.toggle_read().await,
                "toggle-spam" => detail.toggle_spam().await,
                "reply" => detail.open_reply(),
                "send" => {
                    detail.set_reply_text(rest);
                    detail.send_reply();
                    println!("(reply discarded - sending is a demo no-op)");
                }
                _ => detail.cancel_reply(),
            }

            match detail.message() {
                Some(message) => render::detail(message, detail.reply_open(), detail.reply_text()),
                None => render::not_found("?"),
            }
        }
    }
}
