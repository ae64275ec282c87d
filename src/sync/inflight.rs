use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::RecordId;

/// Ids with an outstanding poll fetch.
#[derive(Clone, Debug, Default)]
pub struct InFlightSet {
    ids: Arc<Mutex<HashSet<RecordId>>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn ids(&self) -> MutexGuard<'_, HashSet<RecordId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically checks and inserts `id`. `None` if a fetch for it is already out.
    pub fn try_acquire(&self, id: &RecordId) -> Option<InFlightGuard> {
        if !self.ids().insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            set: self.clone(),
            id: id.clone(),
        })
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids().contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

/// Membership of one id; released on drop whatever the fetch outcome was.
#[derive(Debug)]
pub struct InFlightGuard {
    set: InFlightSet,
    id: RecordId,
}

impl InFlightGuard {
    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.ids().remove(&self.id);
    }
}

#[cfg(test)]
#[path = "../tests/sync/inflight_tests.rs"]
mod tests;
