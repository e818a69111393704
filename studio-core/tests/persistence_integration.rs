//! Integration tests for revision persistence across sessions.
//!
//! A session writes its history to a data directory; a second session on
//! the same directory (simulating a page reload) must pick it up.

use studio_core::{
    BranchPolicy, Catalog, FileHistoryStore, HistoryConfig, HistoryStore, PropertyValue,
    StudioState,
};

fn open(dir: &std::path::Path) -> StudioState {
    let store = FileHistoryStore::new(dir).expect("store");
    StudioState::with_store(Catalog::builtin(), HistoryConfig::default(), Box::new(store))
}

fn text(value: &str) -> PropertyValue {
    PropertyValue::String(value.to_string())
}

#[test]
fn test_history_survives_reload() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let mut state = open(dir.path());
        state.select_template("button-animated").expect("select");
        state.set_property("text", text("Buy Now")).expect("edit");
        state.star(0).expect("star");
    }

    let mut state = open(dir.path());
    assert_eq!(state.history().len(), 2);
    assert!(state.history().get(0).expect("first").starred);
    assert_eq!(state.values().get("text"), Some(&text("Buy Now")));

    assert!(state.undo());
    assert_eq!(state.values().get("text"), Some(&text("Click Me")));
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileHistoryStore::new(dir.path()).expect("store");
    std::fs::write(store.path(), "[{ broken").expect("write");

    let mut state = open(dir.path());
    assert!(state.history().is_empty());
    assert!(state.active_template().is_none());

    // The next mutation overwrites the corrupt file.
    state.select_template("card-profile").expect("select");
    let reloaded = FileHistoryStore::new(dir.path()).expect("store");
    assert_eq!(reloaded.load().expect("load").len(), 1);
}

#[test]
fn test_reload_enforces_capacity() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let config = HistoryConfig {
            capacity: 100,
            ..HistoryConfig::default()
        };
        let store = FileHistoryStore::new(dir.path()).expect("store");
        let mut state = StudioState::with_store(Catalog::builtin(), config, Box::new(store));
        state.select_template("progress-bar").expect("select");
        for n in 0..70 {
            state
                .set_property("value", PropertyValue::Number(f64::from(n)))
                .expect("edit");
        }
        assert_eq!(state.history().len(), 71);
    }

    let state = open(dir.path());
    assert_eq!(state.history().len(), 50);
    assert_eq!(
        state.values().get("value"),
        Some(&PropertyValue::Number(69.0))
    );
}

#[test]
fn test_preserve_policy_persists_orphans() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = HistoryConfig {
        branch_policy: BranchPolicy::Preserve,
        ..HistoryConfig::default()
    };
    let store = FileHistoryStore::new(dir.path()).expect("store");
    let mut state = StudioState::with_store(Catalog::builtin(), config, Box::new(store));

    state.select_template("button-animated").expect("select");
    state.set_property("text", text("A")).expect("edit");
    state.set_property("text", text("B")).expect("edit");
    state.undo();
    state.set_property("text", text("C")).expect("edit");

    let reloaded = FileHistoryStore::new(dir.path()).expect("store");
    let texts: Vec<_> = reloaded
        .load()
        .expect("load")
        .into_iter()
        .map(|r| r.snapshot.get("text").map(ToString::to_string))
        .collect();
    assert_eq!(
        texts,
        vec![
            Some("Click Me".to_string()),
            Some("A".to_string()),
            Some("B".to_string()),
            Some("C".to_string()),
        ]
    );
}
