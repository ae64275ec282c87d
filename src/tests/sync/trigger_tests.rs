use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;

use super::*;
use crate::model::ComplianceResult;
use crate::remote::Method;
use crate::sync::{Poller, RecordSource, SyncStatus};

fn tfstate(id: &str, validating: bool) -> TfState {
    TfState {
        id: RecordId::from(id),
        timestamp: 0,
        account: String::new(),
        bucket: "states".to_string(),
        path: format!("{id}.tfstate"),
        tags: Vec::new(),
        last_update: String::new(),
        compliance_result: ComplianceResult::default(),
        force_validation: validating,
    }
}

/// Fake server: `fire` sets the record validating, fetches report the flag.
#[derive(Clone)]
struct FakeServer {
    validating: Arc<AtomicBool>,
    reject: Arc<AtomicBool>,
    release: Arc<Semaphore>,
}

impl FakeServer {
    fn new() -> Self {
        Self {
            validating: Arc::new(AtomicBool::new(false)),
            reject: Arc::new(AtomicBool::new(false)),
            release: Arc::new(Semaphore::new(0)),
        }
    }
}

impl TriggerTarget<TfState> for FakeServer {
    fn fire(&self, id: &RecordId) -> impl Future<Output = Result<(), GatewayError>> + Send {
        let this = self.clone();
        let path = TfState::validate_path(id);
        async move {
            this.release.acquire().await.expect("semaphore open").forget();
            if this.reject.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    method: Method::Post,
                    path,
                    status: 500,
                    body: "validator down".to_string(),
                });
            }
            this.validating.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}

impl RecordSource<TfState> for FakeServer {
    fn fetch_one(&self, id: &RecordId) -> impl Future<Output = Result<TfState, GatewayError>> + Send {
        let record = tfstate(id.as_str(), self.validating.load(Ordering::SeqCst));
        async move { Ok(record) }
    }
}

fn idle_records() -> SharedRecords<TfState> {
    let records = SharedRecords::new();
    records.lock().replace_all(vec![tfstate("s1", false)]);
    records
}

async fn settle_polls(poller: &Poller<TfState, FakeServer>) {
    for h in poller.tick() {
        h.await.expect("fetch task");
    }
}

#[tokio::test]
async fn trigger_echoes_locally_then_hands_off_to_poller() {
    let server = FakeServer::new();
    let records = idle_records();
    let poller = Poller::new(server.clone(), records.clone());
    let s1 = RecordId::from("s1");

    let pending = spawn_trigger(&records, &server, &s1).expect("idle record");
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingLocalEcho));
    // The poller leaves a record alone until the trigger is acknowledged.
    assert!(poller.tick().is_empty());

    server.release.add_permits(1);
    pending.await.expect("join").expect("trigger accepted");
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingRemote));

    settle_polls(&poller).await;
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingRemote));

    server.validating.store(false, Ordering::SeqCst);
    settle_polls(&poller).await;
    assert_eq!(records.status(&s1), Some(SyncStatus::Idle));
}

#[tokio::test]
async fn rejected_trigger_rolls_back_with_error() {
    let server = FakeServer::new();
    server.reject.store(true, Ordering::SeqCst);
    server.release.add_permits(1);
    let records = idle_records();
    let s1 = RecordId::from("s1");

    let err = trigger(&records, &server, &s1)
        .await
        .expect_err("server rejected");
    assert!(matches!(
        err,
        TriggerError::Gateway(GatewayError::Status { status: 500, .. })
    ));

    let row = records.lock().get(&s1).cloned().expect("row");
    assert_eq!(row.status, SyncStatus::Idle);
    assert!(row.last_error.as_deref().is_some_and(|e| e.contains("500")));
}

#[tokio::test]
async fn trigger_on_busy_record_sends_nothing() {
    let server = FakeServer::new();
    let records = SharedRecords::new();
    records.lock().replace_all(vec![tfstate("s1", true)]);

    let err = spawn_trigger(&records, &server, &RecordId::from("s1"))
        .expect_err("already validating");
    assert!(matches!(err, SyncError::Busy { .. }));
    assert_eq!(server.release.available_permits(), 0);
    assert!(!server.validating.load(Ordering::SeqCst));
}

#[tokio::test]
async fn collection_refresh_before_ack_does_not_lose_the_ack() {
    let server = FakeServer::new();
    let records = idle_records();
    let poller = Poller::new(server.clone(), records.clone());
    let s1 = RecordId::from("s1");

    let pending = spawn_trigger(&records, &server, &s1).expect("idle record");
    records.lock().replace_all(vec![tfstate("s1", false)]);
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingLocalEcho));

    server.release.add_permits(1);
    pending.await.expect("join").expect("trigger accepted");
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingRemote));
    assert_eq!(poller.tick().len(), 1);
}
