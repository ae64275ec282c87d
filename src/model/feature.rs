use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

/// A compliance feature (gherkin source) applied to tfstates carrying one of its tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: RecordId,

    #[serde(default)]
    pub timestamp: i64,

    pub name: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub disabled: bool,
}

impl Feature {
    pub fn state_label(&self) -> &'static str {
        if self.disabled { "disabled" } else { "enabled" }
    }
}

impl Record for Feature {
    const COLLECTION: &'static str = "/features";
    const LABEL: &'static str = "feature";

    fn id(&self) -> &RecordId {
        &self.id
    }
}
