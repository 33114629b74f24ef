//! Record validation.

use chrono::Datelike;

use super::model::MessageRecord;

/// Years a stored `Date` may fall in. Outside this range RFC 3339 has no
/// four-digit year to write.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Reason a record cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The id is empty or whitespace.
    EmptyId,
    /// The timestamp's year is outside 1 to 9999.
    TimestampOutOfRange,
}

impl RecordError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyId => "Message id is required",
            Self::TimestampOutOfRange => "Message date must fall between the years 1 and 9999",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => "id",
            Self::TimestampOutOfRange => "date",
        }
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RecordError {}

/// Check that a record can be stored.
///
/// Ids are the store key, so a blank id would silently merge every
/// idless record into one.
///
/// # Errors
///
/// Returns `RecordError::EmptyId` if the id is empty or whitespace, and
/// `RecordError::TimestampOutOfRange` if the date could not be read back.
pub fn validate_record(record: &MessageRecord) -> Result<(), RecordError> {
    if record.id.trim().is_empty() {
        return Err(RecordError::EmptyId);
    }
    if !YEAR_RANGE.contains(&record.timestamp.year()) {
        return Err(RecordError::TimestampOutOfRange);
    }
    Ok(())
}
