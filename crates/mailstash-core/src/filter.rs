//! Message filtering.
//!
//! Every filter is a pure function over a slice of records that returns the
//! matching records in their original order. Text filters ignore case, and a
//! blank search term matches everything.

use chrono::{DateTime, Utc};

use crate::message::MessageRecord;

/// Records whose subject contains `keyword`, ignoring case.
#[must_use]
pub fn by_subject(records: &[MessageRecord], keyword: &str) -> Vec<MessageRecord> {
    by_text(records, keyword, |r| r.subject.as_str())
}

/// Records whose sender contains `sender`, ignoring case.
#[must_use]
pub fn by_sender(records: &[MessageRecord], sender: &str) -> Vec<MessageRecord> {
    by_text(records, sender, |r| r.sender.as_str())
}

/// Records with `from <= timestamp <= to`.
#[must_use]
pub fn by_date_range(
    records: &[MessageRecord],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<MessageRecord> {
    records
        .iter()
        .filter(|r| r.timestamp >= from && r.timestamp <= to)
        .cloned()
        .collect()
}

/// Records whose attachment flag equals `has_attachments`.
#[must_use]
pub fn by_attachments(records: &[MessageRecord], has_attachments: bool) -> Vec<MessageRecord> {
    records
        .iter()
        .filter(|r| r.has_attachments == has_attachments)
        .cloned()
        .collect()
}

fn by_text<F>(records: &[MessageRecord], needle: &str, field: F) -> Vec<MessageRecord>
where
    F: Fn(&MessageRecord) -> &str,
{
    let needle = needle.trim();
    if needle.is_empty() {
        return records.to_vec();
    }
    let needle = needle.to_lowercase();
    records
        .iter()
        .filter(|r| field(r).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// A combination of filters, all optional.
///
/// Unset criteria do not restrict the result. An open-ended date range is
/// allowed: only `since` or only `until` may be given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Subject substring.
    pub subject: Option<String>,
    /// Sender substring.
    pub sender: Option<String>,
    /// Earliest timestamp, inclusive.
    pub since: Option<DateTime<Utc>>,
    /// Latest timestamp, inclusive.
    pub until: Option<DateTime<Utc>>,
    /// Required attachment flag.
    pub has_attachments: Option<bool>,
}

impl FilterCriteria {
    /// Creates criteria that match everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to subjects containing `keyword`.
    #[must_use]
    pub fn subject(mut self, keyword: impl Into<String>) -> Self {
        self.subject = Some(keyword.into());
        self
    }

    /// Restrict to senders containing `sender`.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Restrict to messages sent at or after `since`.
    #[must_use]
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Restrict to messages sent at or before `until`.
    #[must_use]
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Restrict to messages with (or without) attachments.
    #[must_use]
    pub fn has_attachments(mut self, has_attachments: bool) -> Self {
        self.has_attachments = Some(has_attachments);
        self
    }

    /// Whether no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.sender.is_none()
            && self.since.is_none()
            && self.until.is_none()
            && self.has_attachments.is_none()
    }

    /// Apply every set criterion in turn.
    #[must_use]
    pub fn apply(&self, records: &[MessageRecord]) -> Vec<MessageRecord> {
        let mut matched = records.to_vec();
        if let Some(keyword) = &self.subject {
            matched = by_subject(&matched, keyword);
        }
        if let Some(sender) = &self.sender {
            matched = by_sender(&matched, sender);
        }
        if self.since.is_some() || self.until.is_some() {
            let from = self.since.unwrap_or(DateTime::<Utc>::MIN_UTC);
            let to = self.until.unwrap_or(DateTime::<Utc>::MAX_UTC);
            matched = by_date_range(&matched, from, to);
        }
        if let Some(has_attachments) = self.has_attachments {
            matched = by_attachments(&matched, has_attachments);
        }
        matched
    }
}
