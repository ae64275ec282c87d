use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

/// A cloud resource discovered outside of any tracked Terraform state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignResource {
    pub id: RecordId,

    /// Discovery time, unix seconds.
    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub date_time: String,

    pub resource_id: String,
    pub resource_type: String,

    #[serde(default)]
    pub is_exception: bool,
}

impl Record for ForeignResource {
    const COLLECTION: &'static str = "/foreignresources";
    const LABEL: &'static str = "foreign resource";

    fn id(&self) -> &RecordId {
        &self.id
    }
}
