use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SharedRecords, SyncError};
use crate::model::{Record, RecordId, TfState};
use crate::remote::{GatewayError, RecordClient};

/// A server action that starts an asynchronous process on one record.
pub trait TriggerTarget<R: Record>: Clone + Send + Sync + 'static {
    fn fire(&self, id: &RecordId) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// `POST /tfstates/{id}/validate`.
#[derive(Clone, Debug)]
pub struct TfStateValidation {
    client: RecordClient,
}

impl TfStateValidation {
    pub fn new(client: RecordClient) -> Self {
        Self { client }
    }
}

impl TriggerTarget<TfState> for TfStateValidation {
    fn fire(&self, id: &RecordId) -> impl Future<Output = Result<(), GatewayError>> + Send {
        self.client.validate_tfstate(id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Runs a trigger end to end: local echo, request, then either hand-off to
/// the poller or rollback to `Idle`.
pub async fn trigger<R: Record, T: TriggerTarget<R>>(
    records: &SharedRecords<R>,
    target: &T,
    id: &RecordId,
) -> Result<(), TriggerError> {
    records.lock().begin_trigger(id)?;
    finish(records, target, id).await
}

/// Applies the local echo now and sends the request in the background, so the
/// caller can redraw before the server answers.
pub fn spawn_trigger<R: Record, T: TriggerTarget<R>>(
    records: &SharedRecords<R>,
    target: &T,
    id: &RecordId,
) -> Result<JoinHandle<Result<(), TriggerError>>, SyncError> {
    records.lock().begin_trigger(id)?;
    let records = records.clone();
    let target = target.clone();
    let id = id.clone();
    Ok(tokio::spawn(async move { finish(&records, &target, &id).await }))
}

async fn finish<R: Record, T: TriggerTarget<R>>(
    records: &SharedRecords<R>,
    target: &T,
    id: &RecordId,
) -> Result<(), TriggerError> {
    match target.fire(id).await {
        Ok(()) => {
            if records.lock().confirm_trigger(id) {
                info!(label = R::LABEL, id = %id, "action accepted; waiting for server");
            } else {
                debug!(label = R::LABEL, id = %id, "record left local echo before ack");
            }
            Ok(())
        }
        Err(err) => {
            if !err.is_session_reset() {
                warn!(label = R::LABEL, id = %id, error = %err, "action failed; rolled back");
            }
            records.lock().fail_trigger(id, err.to_string());
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[path = "../tests/sync/trigger_tests.rs"]
mod tests;
