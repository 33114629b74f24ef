//! Storage trait definitions.

use crate::Result;
use crate::message::MessageRecord;

/// Keyed collection of message records.
///
/// Records are unique by id and kept in save order: saving an id that is
/// already present removes the old record and appends the new one.
pub trait MessageStore: Send + Sync {
    /// Insert or replace a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or cannot be persisted.
    fn save(&self, record: MessageRecord) -> Result<()>;

    /// Insert or replace several records, in order, as one mutation.
    ///
    /// Either every record is stored or none is. Returns the number stored.
    ///
    /// # Errors
    ///
    /// Returns an error if any record is invalid or the batch cannot be
    /// persisted.
    fn save_many(&self, records: Vec<MessageRecord>) -> Result<usize>;

    /// Copy of every record in save order.
    fn load_all(&self) -> Vec<MessageRecord>;

    /// Copy of the record with the given id.
    fn get(&self, id: &str) -> Option<MessageRecord>;

    /// Remove the record with the given id.
    ///
    /// Returns `false` when no such record exists, which is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn delete(&self, id: &str) -> Result<bool>;
}
