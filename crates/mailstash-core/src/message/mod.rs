//! Message records.
//!
//! Plain data types describing a fetched email and its attachments, plus the
//! checks a record must pass before it can be stored.

mod model;
mod validation;

pub use model::{AttachmentRecord, MessageRecord};
pub use validation::{RecordError, validate_record};
