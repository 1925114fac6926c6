// tests/history_tests.rs - Bounded selection history

use kvsift::{HistoryStore, SaveOutcome, SelectionProfile};
use std::fs;
use tempfile::TempDir;

fn profile(pairs: &[(&str, bool)]) -> SelectionProfile {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_same_profile_twice_persists_once() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    let p = profile(&[("date", true), ("url", false)]);

    let mut last_saved = None;
    assert_eq!(store.save(&p, last_saved.as_ref()).unwrap(), SaveOutcome::Saved);
    last_saved = Some(p.clone());

    // same content, different key order
    let again = profile(&[("url", false), ("date", true)]);
    assert_eq!(
        store.save(&again, last_saved.as_ref()).unwrap(),
        SaveOutcome::Unchanged
    );
    assert_eq!(store.load().len(), 1);
}

#[test]
fn test_up_to_three_profiles_kept_oldest_first() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    let profiles = [
        profile(&[("a", true)]),
        profile(&[("b", true)]),
        profile(&[("c", true)]),
    ];

    let mut previous: Option<SelectionProfile> = None;
    for p in &profiles {
        store.save(p, previous.as_ref()).unwrap();
        previous = Some(p.clone());
    }
    assert_eq!(store.load(), profiles.to_vec());
}

#[test]
fn test_fourth_save_evicts_oldest() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    let profiles = [
        profile(&[("a", true)]),
        profile(&[("b", true)]),
        profile(&[("c", true)]),
        profile(&[("d", true)]),
    ];

    let mut previous: Option<SelectionProfile> = None;
    for p in &profiles {
        store.save(p, previous.as_ref()).unwrap();
        previous = Some(p.clone());
    }

    let loaded = store.load();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded, profiles[1..].to_vec());
    assert_eq!(store.latest(), Some(profiles[3].clone()));
}

#[test]
fn test_unchanged_is_judged_against_previous_not_file() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    let p = profile(&[("a", true)]);

    // no previous reference: saved even if identical entries exist
    store.save(&p, None).unwrap();
    store.save(&p, None).unwrap();
    assert_eq!(store.load().len(), 2);
}

#[test]
fn test_round_trip_on_disk_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let store = HistoryStore::new(&path);
    let p = profile(&[("srcname", true), ("dstip", false), ("url", true)]);
    store.save(&p, None).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([{ "srcname": true, "dstip": false, "url": true }])
    );

    let reread = HistoryStore::new(&path).load();
    assert_eq!(reread, vec![p]);
    let keys: Vec<&str> = reread[0].iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["srcname", "dstip", "url"]);
}

#[test]
fn test_reads_history_written_by_hand() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(
        &path,
        r#"[
    {"date": true, "user": false},
    {"date": false},
    {"url": true},
    {"user": true}
]"#,
    )
    .unwrap();

    let store = HistoryStore::new(&path);
    let loaded = store.load();
    // an over-long file is cut to the newest three
    assert_eq!(loaded.len(), 3);
    assert!(loaded[2].is_selected("user"));
    assert_eq!(store.recent()[0], loaded[2]);
}

#[test]
fn test_corrupt_history_is_replaced_on_next_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, "garbage").unwrap();

    let store = HistoryStore::new(&path);
    assert!(store.load().is_empty());

    let p = profile(&[("a", true)]);
    assert_eq!(store.save(&p, None).unwrap(), SaveOutcome::Saved);
    assert_eq!(store.load(), vec![p]);
}
