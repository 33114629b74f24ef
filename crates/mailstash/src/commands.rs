//! Subcommand implementations.
//!
//! Each command writes its report to `out` so it can be checked in tests.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use mailstash_core::{
    Account, Error, FilterCriteria, JsonMessageStore, MessageRecord, MessageStore, attachment_names,
    total_attachment_size, validate_account,
};
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Print every saved message.
pub fn list(store: &impl MessageStore, out: &mut impl Write) -> anyhow::Result<()> {
    print_summaries(&store.load_all(), out, "No saved messages.")
}

/// Print one message with its body and attachments.
pub fn show(store: &impl MessageStore, id: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let record = store
        .get(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    writeln!(out, "Id:      {}", record.id)?;
    writeln!(out, "Date:    {}", record.timestamp.format(DATE_FORMAT))?;
    writeln!(out, "From:    {}", record.sender)?;
    writeln!(out, "To:      {}", record.recipient)?;
    writeln!(out, "Subject: {}", record.subject)?;
    if !record.attachments.is_empty() {
        writeln!(out, "Attachments:")?;
        for attachment in &record.attachments {
            writeln!(
                out,
                "  - {} ({} bytes, {})",
                attachment.file_name, attachment.size, attachment.content_type
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{}", record.body)?;
    Ok(())
}

/// Print the messages matching `criteria`.
pub fn filter(
    store: &impl MessageStore,
    criteria: &FilterCriteria,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let matched = criteria.apply(&store.load_all());
    print_summaries(&matched, out, "No matching messages.")
}

/// Delete a message. With `strict`, a missing id is an error.
pub fn delete(
    store: &impl MessageStore,
    id: &str,
    strict: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if store.delete(id)? {
        info!("Deleted message {}", id);
        writeln!(out, "Deleted {id}.")?;
    } else if strict {
        return Err(Error::NotFound(id.to_string()).into());
    } else {
        writeln!(out, "No message with id {id}.")?;
    }
    Ok(())
}

/// Upsert every record in a JSON array file.
pub fn import(store: &impl MessageStore, file: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let records: Vec<MessageRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of messages", file.display()))?;

    let stored = store.save_many(records)?;
    info!("Imported {} messages from {:?}", stored, file);
    writeln!(out, "Imported {stored} messages.")?;
    Ok(())
}

/// Print record and attachment totals.
pub fn stats(store: &JsonMessageStore, out: &mut impl Write) -> anyhow::Result<()> {
    let records = store.load_all();
    let with_attachments = records.iter().filter(|r| r.has_attachments).count();

    writeln!(out, "Store:            {}", store.path().display())?;
    writeln!(out, "Messages:         {}", records.len())?;
    writeln!(out, "With attachments: {with_attachments}")?;
    writeln!(out, "Attachments:      {}", attachment_names(&records).len())?;
    writeln!(out, "Attachment size:  {} bytes", total_attachment_size(&records))?;
    Ok(())
}

/// Print the configured account and its validation result.
pub fn account(account: Option<&Account>, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(account) = account else {
        writeln!(out, "No account configured.")?;
        return Ok(());
    };

    let shown = account.redacted();
    writeln!(out, "Email:    {}", shown.email)?;
    writeln!(out, "Password: {}", shown.password)?;
    for (label, server) in [("IMAP", &shown.imap), ("SMTP", &shown.smtp)] {
        writeln!(
            out,
            "{label}:     {}:{} ({})",
            server.host,
            server.port,
            server.security.display_name()
        )?;
    }

    match validate_account(account) {
        Ok(()) => writeln!(out, "Configuration OK.")?,
        Err(errors) => {
            writeln!(out, "Configuration problems:")?;
            for error in errors {
                writeln!(out, "  - {}: {}", error.field(), error.message())?;
            }
        }
    }
    Ok(())
}

fn print_summaries(
    records: &[MessageRecord],
    out: &mut impl Write,
    empty: &str,
) -> anyhow::Result<()> {
    if records.is_empty() {
        writeln!(out, "{empty}")?;
        return Ok(());
    }

    for record in records {
        writeln!(
            out,
            "- [{}] From: {}",
            record.timestamp.format(DATE_FORMAT),
            record.sender
        )?;
        writeln!(out, "  Subject: {}", record.subject)?;
    }
    Ok(())
}
