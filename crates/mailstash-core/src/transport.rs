//! Mail transport boundary.
//!
//! A [`MailTransport`] retrieves and sends mail on behalf of the client. The
//! store never talks to a transport; the functions here orchestrate the two.
//!
//! No IMAP or SMTP implementation ships with this crate. Applications that
//! fetch or send mail provide their own [`MailTransport`] and call
//! [`fetch_into_store`], [`send_message`] or [`download_attachment_to`]; the
//! `mailstash` binary only works with records already in the store.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::Result;
use crate::account::is_valid_email;
use crate::attachment::save_attachment;
use crate::message::MessageRecord;
use crate::store::MessageStore;

/// Errors reported by a mail transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No session is open.
    #[error("Not connected to the mail server")]
    NotConnected,

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The message has no attachment with the requested name.
    #[error("Attachment '{name}' not found in message {message_id}")]
    AttachmentNotFound {
        /// Message that was searched.
        message_id: String,
        /// Attachment name that was requested.
        name: String,
    },

    /// Operation failed.
    #[error("Operation failed: {0}")]
    Operation(String),
}

/// A plain-text email to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

impl OutgoingMessage {
    /// Creates a new outgoing message.
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Check the recipient address.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidAddress` if the recipient is missing
    /// or malformed.
    pub fn validate(&self) -> std::result::Result<(), TransportError> {
        if self.to.trim().is_empty() {
            return Err(TransportError::InvalidAddress(
                "No recipient specified".into(),
            ));
        }
        if !is_valid_email(&self.to) {
            return Err(TransportError::InvalidAddress(self.to.clone()));
        }
        Ok(())
    }
}

/// Access to a remote mailbox.
pub trait MailTransport: Send + Sync {
    /// Fetch up to `count` of the most recent messages, newest first.
    fn fetch(
        &self,
        count: usize,
    ) -> impl Future<Output = std::result::Result<Vec<MessageRecord>, TransportError>> + Send;

    /// Send a message.
    fn send(
        &self,
        message: &OutgoingMessage,
    ) -> impl Future<Output = std::result::Result<(), TransportError>> + Send;

    /// Download the decoded bytes of one attachment.
    fn download_attachment(
        &self,
        message_id: &str,
        attachment_name: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send;
}

/// Fetch up to `count` recent messages and upsert them into `store`.
///
/// Returns the number of records stored.
///
/// # Errors
///
/// Returns an error if the fetch fails or the batch cannot be stored. A
/// failed store leaves the store unchanged.
pub async fn fetch_into_store<T, S>(transport: &T, store: &S, count: usize) -> Result<usize>
where
    T: MailTransport,
    S: MessageStore + ?Sized,
{
    if count == 0 {
        return Ok(0);
    }

    let records = transport.fetch(count).await?;
    let stored = store.save_many(records)?;

    info!("Stored {stored} fetched messages");
    Ok(stored)
}

/// Validate and send a message.
///
/// # Errors
///
/// Returns an error if the recipient is invalid or the transport fails.
pub async fn send_message<T: MailTransport>(transport: &T, message: &OutgoingMessage) -> Result<()> {
    message.validate()?;
    transport.send(message).await?;

    info!("Email sent to {}", message.to);
    Ok(())
}

/// Download an attachment and write it into `dir`.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns an error if the download fails or the file cannot be written.
pub async fn download_attachment_to<T: MailTransport>(
    transport: &T,
    message_id: &str,
    attachment_name: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let data = transport
        .download_attachment(message_id, attachment_name)
        .await?;
    save_attachment(&data, dir, attachment_name).await
}
