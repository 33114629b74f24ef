//! Integration tests for the JSON message store.
//!
//! These exercise the store through its public API only: save, reopen,
//! compare.

#![allow(clippy::unwrap_used, clippy::redundant_clone)]

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use tempfile::tempdir;

use mailstash_core::{
    AttachmentRecord, Error, FilterCriteria, JsonMessageStore, MessageRecord, MessageStore,
    filter,
};

fn ids(records: &[MessageRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn upsert_scenario() {
    let dir = tempdir().unwrap();
    let store = JsonMessageStore::open(dir.path().join("emails.json")).unwrap();

    store.save(MessageRecord::new("1", "Hello")).unwrap();
    store.save(MessageRecord::new("1", "Hello2")).unwrap();

    let loaded = store.load_all();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].subject, "Hello2");
}

#[test]
fn delete_scenario() {
    let dir = tempdir().unwrap();
    let store = JsonMessageStore::open(dir.path().join("emails.json")).unwrap();

    store.save(MessageRecord::new("a", "")).unwrap();
    store.save(MessageRecord::new("b", "")).unwrap();
    store.delete("a").unwrap();

    assert_eq!(store.load_all(), vec![MessageRecord::new("b", "")]);
}

#[test]
fn saving_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("emails.json");
    let store = JsonMessageStore::open(&path).unwrap();
    let record = MessageRecord::new("x", "Same").with_body("body");

    store.save(record.clone()).unwrap();
    let first = std::fs::read(&path).unwrap();
    store.save(record.clone()).unwrap();

    assert_eq!(store.load_all(), vec![record]);
    assert_eq!(std::fs::read(&path).unwrap(), first);
}

#[test]
fn filter_scenario_over_stored_records() {
    let dir = tempdir().unwrap();
    let store = JsonMessageStore::open(dir.path().join("emails.json")).unwrap();
    for (id, subject) in [("1", "Optima Practice"), ("2", "Discount"), ("3", "Practice Report")] {
        store.save(MessageRecord::new(id, subject)).unwrap();
    }

    let matched = filter::by_subject(&store.load_all(), "practice");
    assert_eq!(ids(&matched), ["1", "3"]);

    let matched = FilterCriteria::new().subject("PRACTICE").apply(&store.load_all());
    assert_eq!(ids(&matched), ["1", "3"]);
}

#[test]
fn reads_file_written_by_earlier_client_versions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("emails.json");
    std::fs::write(
        &path,
        r#"[
  {
    "Id": "4711",
    "Subject": "Integration Test",
    "Body": "",
    "From": "tester@test.com",
    "To": "",
    "Date": "2025-01-15T10:20:30.5",
    "HasAttachments": true,
    "Attachments": [
      { "FileName": "a.txt", "Size": 12, "ContentType": "text/plain" }
    ]
  }
]"#,
    )
    .unwrap();

    let store = JsonMessageStore::open(&path).unwrap();
    let record = store.get("4711").unwrap();
    assert_eq!(record.sender, "tester@test.com");
    assert_eq!(
        record.timestamp,
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 20, 30).unwrap() + chrono::Duration::milliseconds(500)
    );
    assert_eq!(record.attachments, [AttachmentRecord::new("a.txt", 12, "text/plain")]);
}

#[test]
fn dates_beyond_four_digit_years_are_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("emails.json");
    let store = JsonMessageStore::open(&path).unwrap();
    store.save(MessageRecord::new("ok", "")).unwrap();

    for year in [-1, 10_000] {
        let far = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
        let result = store.save(MessageRecord::new("1", "").with_timestamp(far));
        assert!(matches!(result, Err(Error::InvalidRecord(_))), "year {year}");
    }

    assert_eq!(ids(&JsonMessageStore::open(&path).unwrap().load_all()), ["ok"]);
}

#[test]
fn concurrent_saves_keep_ids_unique() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("emails.json");
    let store = Arc::new(JsonMessageStore::open(&path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..25 {
                    let record = MessageRecord::new(format!("t{t}-{}", n % 10), format!("save {n}"));
                    store.save(record).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let loaded = store.load_all();
    let unique: HashSet<_> = loaded.iter().map(|r| r.id.clone()).collect();
    assert_eq!(loaded.len(), 80);
    assert_eq!(unique.len(), 80);

    let reopened = JsonMessageStore::open(&path).unwrap();
    assert_eq!(reopened.load_all(), loaded);
}

#[derive(Debug, Clone)]
enum Op {
    Save(String, String),
    Delete(String),
}

fn op() -> impl Strategy<Value = Op> {
    let id = prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(String::from);
    prop_oneof![
        3 => (id.clone(), "[a-zA-Z ]{0,12}").prop_map(|(id, subject)| Op::Save(id, subject)),
        1 => id.prop_map(Op::Delete),
    ]
}

/// 0001-01-01T00:00:00Z and 9999-12-31T23:59:59Z as Unix seconds.
const FIRST_STORABLE: i64 = -62_135_596_800;
const LAST_STORABLE: i64 = 253_402_300_799;

fn timestamp_between(first: i64, last: i64) -> impl Strategy<Value = DateTime<Utc>> {
    (first..=last, 0u32..1_000_000_000)
        .prop_filter_map("not a valid instant", |(secs, nanos)| {
            Utc.timestamp_opt(secs, nanos).single()
        })
}

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    timestamp_between(FIRST_STORABLE, LAST_STORABLE)
}

fn attachment() -> impl Strategy<Value = AttachmentRecord> {
    (".{0,16}", any::<u64>(), "[a-z]{1,8}/[a-z0-9.+-]{1,12}")
        .prop_map(|(name, size, content_type)| AttachmentRecord::new(name, size, content_type))
}

fn record_body() -> impl Strategy<Value = MessageRecord> {
    (
        ".{0,24}",
        ".{0,64}",
        ".{0,24}",
        ".{0,24}",
        timestamp(),
        prop::collection::vec(attachment(), 0..3),
    )
        .prop_map(|(subject, body, sender, recipient, timestamp, attachments)| {
            MessageRecord {
                id: String::new(),
                subject,
                body,
                sender,
                recipient,
                timestamp,
                has_attachments: !attachments.is_empty(),
                attachments,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn store_behaves_like_ordered_upsert_list(ops in prop::collection::vec(op(), 0..40)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emails.json");
        let store = JsonMessageStore::open(&path).unwrap();
        let mut model: Vec<MessageRecord> = Vec::new();

        for op in ops {
            match op {
                Op::Save(id, subject) => {
                    let record = MessageRecord::new(id.clone(), subject);
                    store.save(record.clone()).unwrap();
                    model.retain(|r| r.id != id);
                    model.push(record);
                }
                Op::Delete(id) => {
                    let existed = model.iter().any(|r| r.id == id);
                    prop_assert_eq!(store.delete(&id).unwrap(), existed);
                    model.retain(|r| r.id != id);
                }
            }
        }

        let loaded = store.load_all();
        let unique: HashSet<_> = loaded.iter().map(|r| &r.id).collect();
        prop_assert_eq!(unique.len(), loaded.len());
        prop_assert_eq!(&loaded, &model);
        prop_assert_eq!(JsonMessageStore::open(&path).unwrap().load_all(), model);
    }

    #[test]
    fn distinct_records_round_trip(bodies in prop::collection::vec(record_body(), 0..8)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emails.json");
        let store = JsonMessageStore::open(&path).unwrap();

        let records: Vec<MessageRecord> = bodies
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                record.id = format!("msg-{i}");
                record
            })
            .collect();
        for record in &records {
            store.save(record.clone()).unwrap();
        }

        prop_assert_eq!(JsonMessageStore::open(&path).unwrap().load_all(), records);
    }

    #[test]
    fn accepted_saves_always_reopen(
        at in prop_oneof![
            timestamp(),
            timestamp_between(DateTime::<Utc>::MIN_UTC.timestamp(), DateTime::<Utc>::MAX_UTC.timestamp()),
        ]
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emails.json");
        let store = JsonMessageStore::open(&path).unwrap();
        store.save(MessageRecord::new("ok", "")).unwrap();

        let record = MessageRecord::new("1", "").with_timestamp(at);
        let accepted = store.save(record.clone()).is_ok();
        prop_assert_eq!(accepted, (FIRST_STORABLE..=LAST_STORABLE).contains(&at.timestamp()));

        let reopened = JsonMessageStore::open(&path).unwrap();
        prop_assert_eq!(reopened.get("1"), accepted.then_some(record));
        prop_assert_eq!(reopened.len(), if accepted { 2 } else { 1 });
    }
}
