use serde::de::DeserializeOwned;

use super::RecordId;

/// An entity served by one REST collection (`GET /<collection>`, `GET /<collection>/{id}`, ...).
pub trait Record: Clone + std::fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Collection path, e.g. `/tfstates`.
    const COLLECTION: &'static str;
    /// Human label used in logs and dialogs.
    const LABEL: &'static str;

    fn id(&self) -> &RecordId;

    /// Whether the server reports an asynchronous process still running for this record.
    fn remote_pending(&self) -> bool {
        false
    }

    fn item_path(id: &RecordId) -> String {
        format!("{}/{}", Self::COLLECTION, id.as_str())
    }
}
