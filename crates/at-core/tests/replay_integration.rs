//! Offline replay against a real log store and persisted table.
//!
//! Exercises the full batch cycle: load table, load store, apply the
//! expectation-based updates, save both, and verify the processed flags
//! and values survive a reload.

use at_config::PresetName;
use at_core::{LogRecord, LogStore, OfflineUpdater, QTable};

fn record(id: u64, acc: u8, action: &str, misjudge: Option<f64>) -> LogRecord {
    LogRecord {
        id,
        acc_risk: acc,
        up_flag: 0,
        uv_flag: 1,
        has_unknown_ext: 0,
        rp_id_match: None,
        sign_count_risk: 1,
        authenticator_risk: None,
        action: action.to_string(),
        misjudge,
        done: false,
    }
}

#[test]
fn batch_updates_table_and_marks_records() {
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("q_table.json");
    let store = LogStore::new(dir.path().join("decisions.jsonl"));

    let config = PresetName::Offline5d.config();
    let updater = OfflineUpdater::new(&config);

    QTable::zeroed(updater.space().len())
        .save(&table_path)
        .unwrap();
    store
        .save(&[
            record(1, 0, "ACCEPT", Some(1.0)),
            record(2, 2, "reject", Some(0.5)),
            record(3, 1, "TOTP", Some(1.0)), // unknown token
            record(4, 1, "MFA", None),       // no misjudge score
        ])
        .unwrap();

    let mut table = QTable::load(&table_path, updater.space().len()).unwrap();
    let mut records = store.load().unwrap();
    let report = updater.apply_batch(&mut table, &mut records).unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped_unknown_action, 1);
    assert_eq!(report.ineligible, 1);

    table.save(&table_path).unwrap();
    store.save(&records).unwrap();

    let reloaded_records = LogStore::new(dir.path().join("decisions.jsonl"))
        .load()
        .unwrap();
    let done: Vec<bool> = reloaded_records.iter().map(|r| r.done).collect();
    assert_eq!(done, vec![true, true, false, false]);

    let reloaded = QTable::load(&table_path, updater.space().len()).unwrap();
    let accept_idx = updater.space().index(&[0, 0, 1, 0, 1]).unwrap();
    let reject_idx = updater.space().index(&[2, 0, 1, 0, 1]).unwrap();
    assert!(reloaded.row(accept_idx)[0] != 0.0);
    assert!(reloaded.row(reject_idx)[2] != 0.0);
    // Actions that never appeared stay untouched.
    assert_eq!(reloaded.row(accept_idx)[1], 0.0);
}

#[test]
fn second_pass_finds_nothing_eligible() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path().join("decisions.jsonl"));
    let config = PresetName::Offline5d.config();
    let updater = OfflineUpdater::new(&config);

    store.save(&[record(1, 1, "MFA", Some(2.0))]).unwrap();
    let mut table = QTable::zeroed(updater.space().len());

    let mut records = store.load().unwrap();
    let first = updater.apply_batch(&mut table, &mut records).unwrap();
    assert_eq!(first.applied, 1);
    store.save(&records).unwrap();

    let mut records = store.load().unwrap();
    let snapshot = table.clone();
    let second = updater.apply_batch(&mut table, &mut records).unwrap();
    assert_eq!(second.applied, 0);
    assert_eq!(second.ineligible, 1);
    assert_eq!(table, snapshot);
}

#[test]
fn replay_refuses_a_seven_feature_table() {
    let config = PresetName::Offline5d.config();
    let updater = OfflineUpdater::new(&config);
    let mut table = QTable::zeroed(432);
    let mut records = vec![record(1, 0, "ACCEPT", Some(1.0))];
    assert!(updater.apply_batch(&mut table, &mut records).is_err());
}
