use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{InFlightGuard, InFlightSet, SharedRecords, SyncStatus, Tracked};
use crate::model::{Record, RecordId};
use crate::remote::{GatewayError, RecordClient};

/// Where the poller gets the current server version of one record.
pub trait RecordSource<R: Record>: Clone + Send + Sync + 'static {
    fn fetch_one(&self, id: &RecordId) -> impl Future<Output = Result<R, GatewayError>> + Send;
}

impl<R: Record> RecordSource<R> for RecordClient {
    fn fetch_one(&self, id: &RecordId) -> impl Future<Output = Result<R, GatewayError>> + Send {
        self.get::<R>(id)
    }
}

/// Re-fetches every `PendingRemote` record until the server clears its flag,
/// never with more than one fetch per record outstanding.
pub struct Poller<R, S> {
    source: S,
    records: SharedRecords<R>,
    in_flight: InFlightSet,
    alive: Arc<AtomicBool>,
}

impl<R: Record, S: RecordSource<R>> Poller<R, S> {
    pub fn new(source: S, records: SharedRecords<R>) -> Self {
        Self {
            source,
            records,
            in_flight: InFlightSet::new(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn records(&self) -> &SharedRecords<R> {
        &self.records
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the owning view as gone. Fetches still in flight finish but no
    /// longer touch the records.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// One tick: issues a fetch for each pending record that has none outstanding.
    pub fn tick(&self) -> Vec<JoinHandle<()>> {
        if !self.is_alive() {
            return Vec::new();
        }

        let pending = self.records.lock().pending_remote_ids();
        let mut spawned = Vec::with_capacity(pending.len());
        for id in pending {
            let Some(guard) = self.in_flight.try_acquire(&id) else {
                continue;
            };
            debug!(label = R::LABEL, id = %id, "polling pending record");
            spawned.push(tokio::spawn(fetch_and_apply(
                self.source.clone(),
                self.records.clone(),
                Arc::clone(&self.alive),
                guard,
            )));
        }
        spawned
    }

    /// Runs [`Poller::tick`] every `period` until the handle is stopped or dropped.
    pub fn start(self, period: Duration) -> PollerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let alive = Arc::clone(&self.alive);
        let in_flight = self.in_flight.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        self.tick();
                    }
                }
            }
            self.shutdown();
        });

        PollerHandle {
            stop_tx: Some(stop_tx),
            task: Some(task),
            alive,
            in_flight,
        }
    }
}

async fn fetch_and_apply<R: Record, S: RecordSource<R>>(
    source: S,
    records: SharedRecords<R>,
    alive: Arc<AtomicBool>,
    guard: InFlightGuard,
) {
    let id = guard.id().clone();
    match source.fetch_one(&id).await {
        Ok(record) => {
            if !alive.load(Ordering::SeqCst) {
                debug!(label = R::LABEL, id = %id, "view torn down; dropping poll result");
                return;
            }
            let settled = !record.remote_pending();
            if records.lock().apply_fetched(record) && settled {
                debug!(label = R::LABEL, id = %id, "record settled");
            }
        }
        Err(err) if err.is_session_reset() => {
            debug!(label = R::LABEL, id = %id, "poll stopped by session reset");
        }
        Err(err) => {
            // Already reported by the gateway; the next tick retries.
            debug!(label = R::LABEL, id = %id, error = %err, "poll fetch failed");
        }
    }
    drop(guard);
}

/// Owns the recurring timer of a running [`Poller`].
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    alive: Arc<AtomicBool>,
    in_flight: InFlightSet,
}

impl PollerHandle {
    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
            && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancels the timer and waits for the loop to exit.
    pub async fn stop(mut self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(error = %err, "poller task join failed");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Waits until `id` is idle again. `None` on timeout or if the record disappeared.
pub async fn wait_until_settled<R: Record>(
    records: &SharedRecords<R>,
    id: &RecordId,
    timeout: Duration,
) -> Option<Tracked<R>> {
    let check_every = Duration::from_millis(25);
    tokio::time::timeout(timeout, async {
        loop {
            {
                let store = records.lock();
                match store.get(id) {
                    None => return None,
                    Some(t) if t.status == SyncStatus::Idle => return Some(t.clone()),
                    Some(_) => {}
                }
            }
            tokio::time::sleep(check_every).await;
        }
    })
    .await
    .ok()
    .flatten()
}

#[cfg(test)]
#[path = "../tests/sync/poller_tests.rs"]
mod tests;
