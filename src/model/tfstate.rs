use serde::{Deserialize, Serialize};

use super::{ComplianceResult, Record, RecordId};

/// A remote Terraform state checked for compliance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfState {
    pub id: RecordId,

    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub account: String,

    pub bucket: String,
    pub path: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Empty when the state was never fetched.
    #[serde(default)]
    pub last_update: String,

    #[serde(default)]
    pub compliance_result: ComplianceResult,

    /// Server-side validation requested and not finished yet.
    #[serde(default)]
    pub force_validation: bool,
}

impl TfState {
    pub fn location(&self) -> String {
        format!("{}@{}", self.bucket, self.path)
    }

    pub fn last_update_label(&self) -> &str {
        if self.last_update.is_empty() {
            "-"
        } else {
            &self.last_update
        }
    }

    pub fn validate_path(id: &RecordId) -> String {
        format!("{}/validate", Self::item_path(id))
    }
}

impl Record for TfState {
    const COLLECTION: &'static str = "/tfstates";
    const LABEL: &'static str = "tfstate";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn remote_pending(&self) -> bool {
        self.force_validation
    }
}
