//! Message storage.
//!
//! [`MessageStore`] is the storage contract; [`JsonMessageStore`] keeps the
//! collection in memory and mirrors it to a single pretty-printed JSON file
//! after every mutation.

mod json;
mod traits;

pub use json::{JsonMessageStore, RecoveryPolicy};
pub use traits::MessageStore;
