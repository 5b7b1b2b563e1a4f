//! End-to-end behaviour of the record store and snapshot exchange through
//! the public API.

use namebook::exchange::{CopyShare, PresetPicker};
use namebook::{Coordinator, Error, ExchangeReason, ImportOutcome, NameRecord, StoreLocation};
use std::path::Path;

fn coordinator_in(root: &Path) -> Coordinator {
    Coordinator::init(StoreLocation::new(root)).unwrap()
}

#[test]
fn test_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = coordinator_in(dir.path());

    let ada = store.insert("Ada").unwrap();
    assert_eq!(ada.name.as_deref(), Some("Ada"));
    assert!(store.list_all().unwrap().contains(&ada));

    let grace = store.insert("Grace").unwrap();
    assert_ne!(ada.id, grace.id);

    assert!(store.update(ada.id, "Alan").unwrap());
    assert_eq!(
        store.list_all().unwrap(),
        vec![NameRecord::new(ada.id, "Alan"), NameRecord::new(grace.id, "Grace")]
    );
    assert!(!store.update(99, "X").unwrap());

    assert!(store.delete(grace.id).unwrap());
    assert_eq!(store.list_all().unwrap(), vec![NameRecord::new(ada.id, "Alan")]);
    assert!(!store.delete(grace.id).unwrap());

    store.teardown().unwrap();
}

#[test]
fn test_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = coordinator_in(dir.path());
    first.insert("Ada").unwrap();
    first.teardown().unwrap();

    let mut second = coordinator_in(dir.path());
    assert_eq!(second.list_all().unwrap(), vec![NameRecord::new(1, "Ada")]);
}

#[test]
fn test_export_requires_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let location = StoreLocation::new(dir.path().join("never-opened"));
    let target = CopyShare::new(dir.path().join("out.db"));

    let err = namebook::SnapshotExchanger::new(location.clone())
        .export_snapshot(&target)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Exchange { reason: ExchangeReason::FileNotFound, .. }
    ));

    let mut store = Coordinator::init(location).unwrap();
    store.insert("Ada").unwrap();
    assert!(store.export_snapshot(&target).is_ok());
}

#[test]
fn test_import_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("ada-grace.db");

    let mut source = coordinator_in(&dir.path().join("phone-a"));
    source.insert("Ada").unwrap();
    source.insert("Grace").unwrap();
    source.export_snapshot(&CopyShare::new(&snapshot)).unwrap();
    source.teardown().unwrap();

    let mut live = coordinator_in(&dir.path().join("phone-b"));
    live.insert("Alan").unwrap();

    let outcome = live
        .import_snapshot(&PresetPicker::new(Some(snapshot)))
        .unwrap();
    assert!(matches!(outcome, ImportOutcome::Imported(ref r) if r.records == 2));
    assert_eq!(
        live.list_all().unwrap(),
        vec![NameRecord::new(1, "Ada"), NameRecord::new(2, "Grace")]
    );

    // New inserts continue after the imported ids.
    let next = live.insert("Katherine").unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn test_cancelled_import_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut live = coordinator_in(dir.path());
    live.insert("Alan").unwrap();
    let before = live.list_all().unwrap();

    let outcome = live.import_snapshot(&PresetPicker::cancelled()).unwrap();

    assert!(outcome.is_cancelled());
    assert_eq!(live.list_all().unwrap(), before);
    assert_eq!(live.stats().unwrap().generation, 1);
}
