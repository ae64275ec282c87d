use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{Record, RecordId};

/// Client-side view of an action on a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing outstanding; fields are as last fetched.
    Idle,
    /// A trigger request was issued and has not been acknowledged yet.
    PendingLocalEcho,
    /// The server acknowledged the action; the record is re-fetched until it settles.
    PendingRemote,
}

impl SyncStatus {
    pub fn is_busy(self) -> bool {
        self != SyncStatus::Idle
    }

    fn of<R: Record>(record: &R) -> Self {
        if record.remote_pending() {
            SyncStatus::PendingRemote
        } else {
            SyncStatus::Idle
        }
    }

    /// Status after a fresh server copy lands on a row that was `self`.
    /// Only the trigger outcome ends a local echo.
    fn refreshed<R: Record>(self, record: &R) -> Self {
        match (self, Self::of(record)) {
            (SyncStatus::PendingLocalEcho, SyncStatus::Idle) => SyncStatus::PendingLocalEcho,
            (_, derived) => derived,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tracked<R> {
    pub record: R,
    pub status: SyncStatus,
    /// Last trigger failure, shown until the next successful action or fetch.
    pub last_error: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("no {label} with id {id}")]
    UnknownRecord { label: &'static str, id: RecordId },

    #[error("{label} {id} is busy ({status:?})")]
    Busy {
        label: &'static str,
        id: RecordId,
        status: SyncStatus,
    },
}

/// Records of one collection in server order, owned by a single view.
#[derive(Debug)]
pub struct RecordStore<R> {
    items: Vec<Tracked<R>>,
    loaded: bool,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-collection fetch: replaces local state.
    pub fn replace_all(&mut self, records: Vec<R>) {
        let items = records
            .into_iter()
            .map(|record| {
                let status = match self.status(record.id()) {
                    Some(prev) => prev.refreshed(&record),
                    None => SyncStatus::of(&record),
                };
                Tracked {
                    status,
                    record,
                    last_error: None,
                }
            })
            .collect();
        self.items = items;
        self.loaded = true;
    }

    /// Whether a full fetch has landed yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Create/update response: replaces the record with the same id or appends it.
    pub fn merge(&mut self, record: R) {
        if !self.apply_fetched(record.clone()) {
            self.items.push(Tracked {
                status: SyncStatus::of(&record),
                record,
                last_error: None,
            });
        }
    }

    /// Poll result: replaces the record in place. Returns false if the id is
    /// no longer present (deleted or replaced by a full fetch meanwhile).
    pub fn apply_fetched(&mut self, record: R) -> bool {
        let Some(slot) = self.slot_mut(record.id()) else {
            return false;
        };
        slot.status = slot.status.refreshed(&record);
        slot.record = record;
        slot.last_error = None;
        true
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<R> {
        let idx = self.items.iter().position(|t| t.record.id() == id)?;
        Some(self.items.remove(idx).record)
    }

    /// `Idle -> PendingLocalEcho`, before the trigger request goes out.
    pub fn begin_trigger(&mut self, id: &RecordId) -> Result<(), SyncError> {
        let slot = self.slot_mut(id).ok_or_else(|| unknown::<R>(id))?;
        if slot.status != SyncStatus::Idle {
            return Err(SyncError::Busy {
                label: R::LABEL,
                id: id.clone(),
                status: slot.status,
            });
        }
        slot.status = SyncStatus::PendingLocalEcho;
        slot.last_error = None;
        Ok(())
    }

    /// `PendingLocalEcho -> PendingRemote`, once the trigger request succeeded.
    /// Returns false when the record left the local-echo state in between.
    pub fn confirm_trigger(&mut self, id: &RecordId) -> bool {
        match self.slot_mut(id) {
            Some(slot) if slot.status == SyncStatus::PendingLocalEcho => {
                slot.status = SyncStatus::PendingRemote;
                true
            }
            _ => false,
        }
    }

    /// `PendingLocalEcho -> Idle` with the error kept for display.
    pub fn fail_trigger(&mut self, id: &RecordId, error: impl Into<String>) -> bool {
        match self.slot_mut(id) {
            Some(slot) if slot.status == SyncStatus::PendingLocalEcho => {
                slot.status = SyncStatus::Idle;
                slot.last_error = Some(error.into());
                true
            }
            _ => false,
        }
    }

    pub fn pending_remote_ids(&self) -> Vec<RecordId> {
        self.items
            .iter()
            .filter(|t| t.status == SyncStatus::PendingRemote)
            .map(|t| t.record.id().clone())
            .collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Tracked<R>> {
        self.items.iter().find(|t| t.record.id() == id)
    }

    pub fn status(&self, id: &RecordId) -> Option<SyncStatus> {
        self.get(id).map(|t| t.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tracked<R>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn slot_mut(&mut self, id: &RecordId) -> Option<&mut Tracked<R>> {
        self.items.iter_mut().find(|t| t.record.id() == id)
    }
}

fn unknown<R: Record>(id: &RecordId) -> SyncError {
    SyncError::UnknownRecord {
        label: R::LABEL,
        id: id.clone(),
    }
}

/// A [`RecordStore`] shared between a view, its poller and its action tasks.
#[derive(Debug)]
pub struct SharedRecords<R> {
    inner: Arc<Mutex<RecordStore<R>>>,
}

impl<R> Clone for SharedRecords<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Default for SharedRecords<R> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecordStore::default())),
        }
    }
}

impl<R: Record> SharedRecords<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, RecordStore<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies the current rows out, for rendering.
    pub fn snapshot(&self) -> Vec<Tracked<R>> {
        self.lock().iter().cloned().collect()
    }

    pub fn status(&self, id: &RecordId) -> Option<SyncStatus> {
        self.lock().status(id)
    }
}

#[cfg(test)]
#[path = "../tests/sync/store_tests.rs"]
mod tests;
