//! Convergent polling of records with a server-side process in flight.
//!
//! A view owns a [`SharedRecords`] collection. Records the server reports as
//! pending are re-fetched one at a time per id until the server clears the
//! flag; [`InFlightSet`] guarantees at most one outstanding fetch per id.

mod inflight;
mod poller;
mod store;
mod trigger;

pub use self::inflight::{InFlightGuard, InFlightSet};
pub use self::poller::{Poller, PollerHandle, RecordSource, wait_until_settled};
pub use self::store::{RecordStore, SharedRecords, SyncError, SyncStatus, Tracked};
pub use self::trigger::{TfStateValidation, TriggerError, TriggerTarget, spawn_trigger, trigger};
