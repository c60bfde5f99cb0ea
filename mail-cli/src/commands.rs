//! Command handlers. Each writes its result to `out`; logs go through tracing.

use std::fs;
use std::io::Write;

use anyhow::{bail, Context, Result};
use mail_core::{Envelope, Message, MessageId};
use mail_storage::{MessageStore, SearchKind, SqliteMessageStore};
use serde_json::json;
use tracing::warn;

use crate::cli::Commands;

const SUBJECT_PREVIEW_LEN: usize = 60;

/// Runs one command against the store.
pub async fn run<W: Write>(store: &SqliteMessageStore, command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Count => {
            let count = store.count().await;
            if count < 0 {
                bail!("Message count unavailable");
            }
            writeln!(out, "{count}")?;
        }
        Commands::List {
            offset,
            limit,
            json,
        } => {
            let messages = store.list(offset, limit).await.context("List messages")?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&messages)?)?;
            } else {
                write_summary(out, &messages)?;
            }
        }
        Commands::Search {
            kind,
            query,
            offset,
            limit,
        } => {
            let kind = SearchKind::parse(&kind);
            let page = store
                .search(kind, &query, offset, limit)
                .await
                .context("Search messages")?;
            if let Err(e) = &page.total {
                warn!(error = %e, "Total match count unavailable");
            }
            let result = json!({
                "kind": kind,
                "query": query,
                "total": page.total_or_sentinel(),
                "count": page.messages.len(),
                "messages": page.messages,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        Commands::Show { id } => {
            let message = store
                .load(&MessageId::new(id.as_str()))
                .await
                .with_context(|| format!("Load message {id}"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&message)?)?;
        }
        Commands::ShowRow { row } => {
            let message = store
                .load_by_row(row)
                .await
                .with_context(|| format!("Load row {row}"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&message)?)?;
        }
        Commands::Store {
            from,
            to,
            helo,
            hostname,
            file,
        } => {
            let data = fs::read_to_string(&file)
                .with_context(|| format!("Read message data from {}", file.display()))?;
            let envelope = Envelope {
                from,
                to,
                data,
                helo,
            };
            let id = MessageId::generate(&hostname);
            let message = envelope
                .into_message(id.clone())
                .context("Build message from envelope")?;
            let row_id = store.store(&message).await.context("Store message")?;
            writeln!(out, "{row_id} {id}")?;
        }
        Commands::Delete { id } => {
            store
                .delete_one(&MessageId::new(id.as_str()))
                .await
                .with_context(|| format!("Delete message {id}"))?;
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                bail!("Refusing to delete all messages without --yes");
            }
            store.delete_all().await.context("Delete all messages")?;
        }
    }
    Ok(())
}

/// First `max_chars` characters of `text`, cut on a char boundary.
fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn write_summary<W: Write>(out: &mut W, messages: &[Message]) -> Result<()> {
    if messages.is_empty() {
        writeln!(out, "No messages.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<40} {:<20} {:<28} {:<28} {}",
        "id", "created", "from", "to", "subject"
    )?;
    writeln!(out, "{}", "-".repeat(140))?;

    for m in messages {
        let subject = m.content.header("Subject").unwrap_or("-");
        let subject = preview(subject, SUBJECT_PREVIEW_LEN);
        writeln!(
            out,
            "{:<40} {:<20} {:<28} {:<28} {}",
            m.id,
            m.created.format("%Y-%m-%d %H:%M:%S"),
            m.raw.from,
            m.raw.to.join(","),
            subject
        )?;
    }
    Ok(())
}
