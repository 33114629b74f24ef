//! Message record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about one attachment of a message.
///
/// The attachment bytes are never stored; they are fetched from the
/// transport on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachmentRecord {
    /// File name as announced by the sender.
    pub file_name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
}

impl AttachmentRecord {
    /// Creates attachment metadata.
    #[must_use]
    pub fn new(file_name: impl Into<String>, size: u64, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            size,
            content_type: content_type.into(),
        }
    }
}

/// A message as persisted in the store.
///
/// Field names on disk are `Id`, `Subject`, `Body`, `From`, `To`, `Date`,
/// `HasAttachments` and `Attachments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MessageRecord {
    /// Unique key within a store.
    pub id: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body (or HTML when no text part exists).
    pub body: String,
    /// Sender address as displayed by the transport.
    #[serde(rename = "From")]
    pub sender: String,
    /// Recipient addresses as displayed by the transport.
    #[serde(rename = "To")]
    pub recipient: String,
    /// When the message was sent, in UTC.
    #[serde(rename = "Date", with = "timestamp_serde")]
    pub timestamp: DateTime<Utc>,
    /// Whether the message carries attachments.
    pub has_attachments: bool,
    /// Attachment metadata in message order.
    pub attachments: Vec<AttachmentRecord>,
}

impl MessageRecord {
    /// Creates a record with the given id and subject.
    #[must_use]
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Sets the recipient.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Appends an attachment and marks the message as having attachments.
    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentRecord) -> Self {
        self.attachments.push(attachment);
        self.has_attachments = true;
        self
    }

    /// Sum of the sizes of all attachments.
    #[must_use]
    pub fn attachment_size(&self) -> u64 {
        self.attachments.iter().map(|a| a.size).sum()
    }
}

/// Serde helpers for the `Date` field.
///
/// Written as RFC 3339 in UTC. On read, timestamps without an offset are
/// accepted and taken to be UTC.
mod timestamp_serde {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s}")))
    }

    fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
            return Some(timestamp.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
