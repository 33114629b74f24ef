//! JSON file backed message store.
//!
//! The whole collection lives in memory behind one mutex. Every mutation
//! stages a new collection, writes it as a complete snapshot to a sibling
//! temporary file, renames that over the target, and only then commits the
//! staged collection to memory. A failed write therefore leaves memory and
//! disk in agreement.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::traits::MessageStore;
use crate::message::{MessageRecord, validate_record};
use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// What to do when the store file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Fail with [`Error::CorruptData`].
    #[default]
    Strict,
    /// Start with an empty collection. The corrupt file is left on disk
    /// until the next successful write replaces it.
    DiscardCorrupt,
}

/// Message store persisted as a JSON array in a single file.
#[derive(Debug)]
pub struct JsonMessageStore {
    path: PathBuf,
    records: Mutex<Vec<MessageRecord>>,
    recovered_from_corrupt: bool,
}

impl JsonMessageStore {
    /// Open the store at `path`, failing on a corrupt file.
    ///
    /// A missing file yields an empty store; the file is created by the
    /// first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageIo`] if the file exists but cannot be read and
    /// [`Error::CorruptData`] if it does not parse.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, RecoveryPolicy::Strict)
    }

    /// Open the store at `path` with an explicit corrupt-file policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageIo`] if the file exists but cannot be read, and
    /// [`Error::CorruptData`] if it does not parse under
    /// [`RecoveryPolicy::Strict`].
    pub fn open_with(path: impl AsRef<Path>, policy: RecoveryPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let (records, recovered_from_corrupt) = match read_snapshot(&path) {
            Ok(records) => (records, false),
            Err(Error::CorruptData { source, .. }) if policy == RecoveryPolicy::DiscardCorrupt => {
                warn!(
                    "Discarding unreadable message file {}: {source}",
                    path.display()
                );
                (Vec::new(), true)
            }
            Err(e) => return Err(e),
        };

        debug!(
            "Opened message store {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
            recovered_from_corrupt,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether a corrupt file was discarded when the store was opened.
    #[must_use]
    pub const fn recovered_from_corrupt(&self) -> bool {
        self.recovered_from_corrupt
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MessageRecord>> {
        // Memory only ever holds committed snapshots, so a poisoned lock
        // still guards a consistent collection.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `records` to a temporary sibling, then rename it over the target.
    fn write_snapshot(&self, records: &[MessageRecord]) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(records)?;
        json.push(b'\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::storage_io(parent, e))?;
        }

        let tmp = temp_path(&self.path);
        if let Err(e) = write_synced(&tmp, &json) {
            let _ = fs::remove_file(&tmp);
            return Err(Error::storage_io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(Error::storage_io(&self.path, e));
        }
        // The new snapshot is already visible, so a failed directory sync
        // must not fail the mutation and split memory from disk.
        if let Err(e) = sync_parent_dir(&self.path) {
            warn!(
                "Could not sync directory of {}: {e}",
                self.path.display()
            );
        }

        debug!(
            "Wrote {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl MessageStore for JsonMessageStore {
    fn save(&self, record: MessageRecord) -> Result<()> {
        validate_record(&record)?;

        let mut records = self.lock();
        let mut staged = records.clone();
        let id = record.id.clone();
        let replaced = upsert(&mut staged, record);

        self.write_snapshot(&staged)?;
        *records = staged;

        debug!("Saved message {id} (replaced: {replaced})");
        Ok(())
    }

    fn save_many(&self, batch: Vec<MessageRecord>) -> Result<usize> {
        for record in &batch {
            validate_record(record)?;
        }
        if batch.is_empty() {
            return Ok(0);
        }

        let mut records = self.lock();
        let mut staged = records.clone();
        let count = batch.len();
        for record in batch {
            upsert(&mut staged, record);
        }

        self.write_snapshot(&staged)?;
        *records = staged;

        debug!("Saved batch of {count} messages");
        Ok(count)
    }

    fn load_all(&self) -> Vec<MessageRecord> {
        self.lock().clone()
    }

    fn get(&self, id: &str) -> Option<MessageRecord> {
        self.lock().iter().find(|r| r.id == id).cloned()
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.lock();
        if !records.iter().any(|r| r.id == id) {
            debug!("Delete of unknown message {id} ignored");
            return Ok(false);
        }

        let staged: Vec<MessageRecord> = records.iter().filter(|r| r.id != id).cloned().collect();

        self.write_snapshot(&staged)?;
        *records = staged;

        debug!("Deleted message {id}");
        Ok(true)
    }
}

/// Remove any record with the same id, then append. Returns whether a
/// record was replaced.
fn upsert(records: &mut Vec<MessageRecord>, record: MessageRecord) -> bool {
    let before = records.len();
    records.retain(|r| r.id != record.id);
    let replaced = records.len() != before;
    records.push(record);
    replaced
}

/// Load the snapshot at `path`.
///
/// Missing, empty and `null` files all mean "no records". Duplicate ids are
/// resolved as if the array had been saved record by record. Records with a
/// blank id cannot be saved any more, but older files may hold several of
/// them; those are all kept, in place.
fn read_snapshot(path: &Path) -> Result<Vec<MessageRecord>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::storage_io(path, e)),
    };

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let loaded: Option<Vec<MessageRecord>> =
        serde_json::from_slice(bytes).map_err(|source| Error::CorruptData {
            path: path.to_path_buf(),
            source,
        })?;

    let loaded = loaded.unwrap_or_default();
    let total = loaded.len();
    let mut records = Vec::with_capacity(total);
    let mut blank_ids = 0;
    for record in loaded {
        if record.id.trim().is_empty() {
            blank_ids += 1;
            records.push(record);
        } else {
            upsert(&mut records, record);
        }
    }

    if records.len() != total {
        warn!(
            "{} duplicate message ids in {}, keeping the last of each",
            total - records.len(),
            path.display()
        );
    }
    if blank_ids > 0 {
        warn!(
            "{blank_ids} messages without an id in {}",
            path.display()
        );
    }

    Ok(records)
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Flush the directory entry of `path` so a completed rename survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => File::open(".")?.sync_all(),
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
