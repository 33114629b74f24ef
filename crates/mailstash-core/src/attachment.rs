//! Attachment helpers.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::message::MessageRecord;

/// File name used when an attachment announces none.
pub const DEFAULT_ATTACHMENT_NAME: &str = "attachment";

/// Total size in bytes of every attachment across `records`.
#[must_use]
pub fn total_attachment_size(records: &[MessageRecord]) -> u64 {
    records.iter().map(MessageRecord::attachment_size).sum()
}

/// Every attachment file name, in record then attachment order.
#[must_use]
pub fn attachment_names(records: &[MessageRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.attachments.iter().map(|a| a.file_name.clone()))
        .collect()
}

/// Reduce an attachment name to a bare file name.
///
/// Any directory part is dropped so the result always names a file directly
/// inside the output directory.
#[must_use]
pub fn safe_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        DEFAULT_ATTACHMENT_NAME.to_string()
    } else {
        base.to_string()
    }
}

/// Write attachment bytes to `dir`, creating it if needed.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub async fn save_attachment(data: &[u8], dir: &Path, file_name: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(safe_file_name(file_name));
    tokio::fs::write(&path, data).await?;

    debug!("Saved {} byte attachment to {}", data.len(), path.display());
    Ok(path)
}
