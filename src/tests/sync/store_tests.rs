use super::*;
use crate::model::{ComplianceResult, TfState};

fn tfstate(id: &str, validating: bool) -> TfState {
    TfState {
        id: RecordId::from(id),
        timestamp: 0,
        account: "prod".to_string(),
        bucket: "states".to_string(),
        path: format!("{id}.tfstate"),
        tags: vec!["default".to_string()],
        last_update: String::new(),
        compliance_result: ComplianceResult::default(),
        force_validation: validating,
    }
}

fn id(s: &str) -> RecordId {
    RecordId::from(s)
}

#[test]
fn replace_all_derives_status_from_server_flag() {
    let mut store = RecordStore::new();
    assert!(!store.is_loaded());
    store.replace_all(vec![tfstate("1", false), tfstate("2", true)]);

    assert!(store.is_loaded());
    assert_eq!(store.status(&id("1")), Some(SyncStatus::Idle));
    assert_eq!(store.status(&id("2")), Some(SyncStatus::PendingRemote));
    assert_eq!(store.pending_remote_ids(), vec![id("2")]);
}

#[test]
fn trigger_walks_local_echo_then_remote_then_idle() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", false)]);

    store.begin_trigger(&id("1")).expect("idle record can be triggered");
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingLocalEcho));
    assert!(store.pending_remote_ids().is_empty(), "local echo is not polled");

    assert!(store.confirm_trigger(&id("1")));
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingRemote));
    assert_eq!(store.pending_remote_ids(), vec![id("1")]);

    assert!(store.apply_fetched(tfstate("1", true)));
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingRemote));

    assert!(store.apply_fetched(tfstate("1", false)));
    assert_eq!(store.status(&id("1")), Some(SyncStatus::Idle));
}

#[test]
fn busy_record_rejects_second_trigger() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", true)]);

    let err = store.begin_trigger(&id("1")).expect_err("pending record is busy");
    assert_eq!(
        err,
        SyncError::Busy {
            label: "tfstate",
            id: id("1"),
            status: SyncStatus::PendingRemote,
        }
    );
    assert_eq!(
        store.begin_trigger(&id("nope")),
        Err(SyncError::UnknownRecord {
            label: "tfstate",
            id: id("nope"),
        })
    );
}

#[test]
fn failed_trigger_rolls_back_to_idle_and_keeps_error() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", false)]);
    store.begin_trigger(&id("1")).expect("begin");

    assert!(store.fail_trigger(&id("1"), "status 500"));
    let t = store.get(&id("1")).expect("row");
    assert_eq!(t.status, SyncStatus::Idle);
    assert_eq!(t.last_error.as_deref(), Some("status 500"));

    // A later trigger clears the error again.
    store.begin_trigger(&id("1")).expect("retry");
    assert_eq!(store.get(&id("1")).and_then(|t| t.last_error.clone()), None);
}

#[test]
fn confirm_and_fail_ignore_records_not_in_local_echo() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", false)]);

    assert!(!store.confirm_trigger(&id("1")));
    assert!(!store.fail_trigger(&id("1"), "boom"));
    assert!(!store.confirm_trigger(&id("missing")));
    assert_eq!(store.status(&id("1")), Some(SyncStatus::Idle));
}

#[test]
fn fetch_for_removed_record_is_ignored() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", true)]);
    assert!(store.remove(&id("1")).is_some());

    assert!(!store.apply_fetched(tfstate("1", false)));
    assert!(store.is_empty());
}

#[test]
fn merge_replaces_in_place_or_appends() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", false), tfstate("2", false)]);

    let mut edited = tfstate("1", false);
    edited.path = "moved.tfstate".to_string();
    store.merge(edited);
    store.merge(tfstate("3", false));

    let ids: Vec<_> = store.iter().map(|t| t.record.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(
        store.get(&id("1")).map(|t| t.record.path.as_str()),
        Some("moved.tfstate")
    );
}

#[test]
fn shared_records_snapshot_sees_updates_from_clones() {
    let shared = SharedRecords::<TfState>::new();
    let other = shared.clone();
    other.lock().replace_all(vec![tfstate("1", true)]);

    let rows = shared.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(shared.status(&id("1")), Some(SyncStatus::PendingRemote));
}

#[test]
fn refresh_during_local_echo_keeps_the_echo_until_the_ack() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", false), tfstate("2", false)]);
    store.begin_trigger(&id("1")).expect("begin");

    // Server has not flipped the flag yet.
    store.replace_all(vec![tfstate("1", false), tfstate("2", false)]);
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingLocalEcho));
    assert_eq!(store.status(&id("2")), Some(SyncStatus::Idle));
    assert!(store.apply_fetched(tfstate("1", false)));
    store.merge(tfstate("1", false));
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingLocalEcho));

    assert!(store.confirm_trigger(&id("1")));
    assert_eq!(store.pending_remote_ids(), vec![id("1")]);
}

#[test]
fn refresh_showing_server_flag_moves_local_echo_to_remote() {
    let mut store = RecordStore::new();
    store.replace_all(vec![tfstate("1", false)]);
    store.begin_trigger(&id("1")).expect("begin");

    store.replace_all(vec![tfstate("1", true)]);
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingRemote));
    assert!(!store.confirm_trigger(&id("1")));
    assert_eq!(store.status(&id("1")), Some(SyncStatus::PendingRemote));
}
