//! # mailstash-core
//!
//! Core library for the `mailstash` email client.
//!
//! This crate provides:
//! - Message records and their validation
//! - A JSON file backed message store with snapshot persistence
//! - Message filters
//! - Attachment helpers
//! - Account configuration and validation
//! - The mail transport boundary and fetch/send/download orchestration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod attachment;
mod error;
pub mod filter;
pub mod message;
pub mod store;
pub mod transport;

pub use account::{Account, Security, ServerConfig, ValidationError, ValidationResult, validate_account};
pub use attachment::{attachment_names, save_attachment, total_attachment_size};
pub use error::{Error, Result};
pub use filter::FilterCriteria;
pub use message::{AttachmentRecord, MessageRecord, RecordError, validate_record};
pub use store::{JsonMessageStore, MessageStore, RecoveryPolicy};
pub use transport::{
    MailTransport, OutgoingMessage, TransportError, download_attachment_to, fetch_into_store,
    send_message,
};
