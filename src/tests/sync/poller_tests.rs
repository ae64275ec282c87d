use std::sync::atomic::AtomicUsize;

use tokio::sync::Semaphore;

use super::*;
use crate::model::{ComplianceResult, TfState};
use crate::remote::Method;

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

/// Answers with the configured `force_validation` flag once a permit is released.
#[derive(Clone)]
struct FakeSource {
    calls: Arc<AtomicUsize>,
    validating: Arc<AtomicBool>,
    fail_next: Arc<AtomicBool>,
    release: Arc<Semaphore>,
}

impl FakeSource {
    fn gated(validating: bool) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            validating: Arc::new(AtomicBool::new(validating)),
            fail_next: Arc::new(AtomicBool::new(false)),
            release: Arc::new(Semaphore::new(0)),
        }
    }

    fn open(validating: bool) -> Self {
        let src = Self::gated(validating);
        src.release.add_permits(Semaphore::MAX_PERMITS / 2);
        src
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordSource<TfState> for FakeSource {
    fn fetch_one(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<TfState, GatewayError>> + Send {
        let this = self.clone();
        let id = id.clone();
        async move {
            this.calls.fetch_add(1, Ordering::SeqCst);
            this.release.acquire().await.expect("semaphore open").forget();
            if this.fail_next.swap(false, Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    method: Method::Get,
                    path: TfState::item_path(&id),
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(tfstate(id.as_str(), this.validating.load(Ordering::SeqCst)))
        }
    }
}

fn pending_records(ids: &[&str]) -> SharedRecords<TfState> {
    let records = SharedRecords::new();
    records
        .lock()
        .replace_all(ids.iter().map(|id| tfstate(id, true)).collect());
    records
}

async fn join_all(handles: Vec<JoinHandle<()>>) {
    for h in handles {
        h.await.expect("fetch task");
    }
}

#[tokio::test]
async fn slow_fetch_is_not_duplicated_by_later_ticks() {
    let src = FakeSource::gated(true);
    let records = pending_records(&["s1"]);
    let poller = Poller::new(src.clone(), records.clone());
    let s1 = RecordId::from("s1");

    let first = poller.tick();
    assert_eq!(first.len(), 1);
    assert!(poller.in_flight().contains(&s1));

    // Ticks while the fetch is outstanding issue nothing.
    assert!(poller.tick().is_empty());
    assert!(poller.tick().is_empty());

    src.release.add_permits(1);
    join_all(first).await;
    assert!(poller.in_flight().is_empty());
    assert_eq!(src.calls(), 1);

    // Still validating: the next tick polls again.
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingRemote));
    let second = poller.tick();
    assert_eq!(second.len(), 1);
    src.release.add_permits(1);
    join_all(second).await;
    assert_eq!(src.calls(), 2);
}

#[tokio::test]
async fn record_settles_when_server_clears_flag() {
    let src = FakeSource::open(false);
    let records = pending_records(&["s1", "s2"]);
    let poller = Poller::new(src.clone(), records.clone());

    join_all(poller.tick()).await;

    assert_eq!(records.status(&RecordId::from("s1")), Some(SyncStatus::Idle));
    assert_eq!(records.status(&RecordId::from("s2")), Some(SyncStatus::Idle));
    assert!(poller.tick().is_empty());
    assert_eq!(src.calls(), 2);
}

#[tokio::test]
async fn failed_fetch_releases_id_and_is_retried() {
    let src = FakeSource::open(false);
    src.fail_next.store(true, Ordering::SeqCst);
    let records = pending_records(&["s1"]);
    let poller = Poller::new(src.clone(), records.clone());
    let s1 = RecordId::from("s1");

    join_all(poller.tick()).await;
    assert!(!poller.in_flight().contains(&s1));
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingRemote));

    join_all(poller.tick()).await;
    assert_eq!(records.status(&s1), Some(SyncStatus::Idle));
    assert_eq!(src.calls(), 2);
}

#[tokio::test]
async fn idle_records_are_never_fetched() {
    let src = FakeSource::open(false);
    let records = SharedRecords::new();
    records
        .lock()
        .replace_all(vec![tfstate("a", false), tfstate("b", false)]);
    let poller = Poller::new(src.clone(), records);

    assert!(poller.tick().is_empty());
    assert_eq!(src.calls(), 0);
}

#[tokio::test]
async fn results_after_shutdown_are_dropped() {
    let src = FakeSource::gated(false);
    let records = pending_records(&["s1"]);
    let poller = Poller::new(src.clone(), records.clone());

    let handles = poller.tick();
    poller.shutdown();
    src.release.add_permits(1);
    join_all(handles).await;

    assert_eq!(
        records.status(&RecordId::from("s1")),
        Some(SyncStatus::PendingRemote)
    );
    assert!(poller.in_flight().is_empty());
    assert!(poller.tick().is_empty());
}

#[tokio::test(start_paused = true)]
async fn started_poller_converges_and_stops() {
    let src = FakeSource::open(true);
    let records = pending_records(&["s1"]);
    let handle = Poller::new(src.clone(), records.clone()).start(Duration::from_millis(10));
    let s1 = RecordId::from("s1");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(records.status(&s1), Some(SyncStatus::PendingRemote));
    assert!(handle.is_running());

    src.validating.store(false, Ordering::SeqCst);
    let settled = wait_until_settled(&records, &s1, Duration::from_secs(5))
        .await
        .expect("record settles");
    assert!(!settled.record.force_validation);

    handle.stop().await;
    let calls = src.calls();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(src.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_timer() {
    let src = FakeSource::open(true);
    let records = pending_records(&["s1"]);
    let handle = Poller::new(src.clone(), records).start(Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(30)).await;
    drop(handle);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let calls = src.calls();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(src.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn wait_until_settled_times_out_on_stuck_record() {
    let records = pending_records(&["s1"]);
    let got = wait_until_settled(&records, &RecordId::from("s1"), Duration::from_millis(60)).await;
    assert!(got.is_none());
}
