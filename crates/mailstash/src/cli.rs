//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use mailstash_core::FilterCriteria;

#[derive(Parser, Debug)]
#[command(name = "mailstash", version)]
#[command(about = "Keep a local JSON store of saved email messages")]
#[command(
    after_help = "Fetching, sending and attachment downloads are library functions in \
                  mailstash-core and need a MailTransport implementation; this binary \
                  only works with messages already in the store."
)]
pub struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Message store file, overriding the settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Start from an empty store if the store file is corrupt
    #[arg(long, global = true)]
    pub recover_corrupt: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List saved messages
    List,

    /// Show one message in full
    Show {
        /// Message identifier
        id: String,
    },

    /// List messages matching every given criterion
    Filter(FilterArgs),

    /// Delete a message
    Delete {
        /// Message identifier
        id: String,

        /// Fail if no message has this identifier
        #[arg(long)]
        strict: bool,
    },

    /// Save every message in a JSON array file, replacing existing ids
    Import {
        /// File holding a JSON array of messages
        file: PathBuf,
    },

    /// Show counts and attachment totals
    Stats,

    /// Show and validate the configured account
    Account,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive subject substring
    #[arg(long)]
    pub subject: Option<String>,

    /// Case-insensitive sender substring
    #[arg(long)]
    pub sender: Option<String>,

    /// Earliest date (RFC 3339 or YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_since)]
    pub since: Option<DateTime<Utc>>,

    /// Latest date (RFC 3339 or YYYY-MM-DD, inclusive of the whole day)
    #[arg(long, value_parser = parse_until)]
    pub until: Option<DateTime<Utc>>,

    /// Only messages with attachments
    #[arg(long, conflicts_with = "no_attachments")]
    pub attachments: bool,

    /// Only messages without attachments
    #[arg(long)]
    pub no_attachments: bool,
}

impl FilterArgs {
    /// Build the filter these arguments describe.
    pub fn criteria(&self) -> FilterCriteria {
        let has_attachments = if self.attachments {
            Some(true)
        } else if self.no_attachments {
            Some(false)
        } else {
            None
        };
        FilterCriteria {
            subject: self.subject.clone(),
            sender: self.sender.clone(),
            since: self.since,
            until: self.until,
            has_attachments,
        }
    }
}

fn parse_since(value: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(value, NaiveTime::MIN)
}

fn parse_until(value: &str) -> Result<DateTime<Utc>, String> {
    let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
        .ok_or_else(|| "invalid end of day".to_string())?;
    parse_instant(value, end_of_day)
}

/// Parse an RFC 3339 timestamp, or a bare date at `time_of_day` UTC.
fn parse_instant(value: &str, time_of_day: NaiveTime) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(time_of_day).and_utc())
        .map_err(|_| format!("expected RFC 3339 or YYYY-MM-DD, got '{value}'"))
}
