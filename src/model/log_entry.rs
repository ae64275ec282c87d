use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Record, RecordId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// An ad-hoc validation of a plan file.
    Validation,
    /// A tracked tfstate changed and was re-validated.
    Tfstate,
    #[serde(other)]
    Unknown,
}

impl LogKind {
    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Validation => "validation",
            LogKind::Tfstate => "state change",
            LogKind::Unknown => "?",
        }
    }
}

/// A change or validation log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: RecordId,

    #[serde(default)]
    pub timestamp: i64,

    pub kind: LogKind,

    #[serde(default)]
    pub date_time: String,

    /// `bucket:path` for tfstate entries.
    #[serde(default)]
    pub details: String,

    #[serde(default)]
    pub compliance_errors: u32,

    #[serde(default)]
    pub compliance_tests: u32,

    #[serde(default)]
    pub compliance_errors_prev: u32,

    #[serde(default)]
    pub compliance_tests_prev: u32,

    #[serde(default)]
    pub lines_added: u32,

    #[serde(default)]
    pub lines_removed: u32,

    // Only present on `GET /logs/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_diff_html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_features: Option<BTreeMap<String, bool>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_fail_messages: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default)]
    pub compliance_prev: bool,
}

impl LogEntry {
    pub fn result_label(&self) -> String {
        validation_label(self.compliance_errors, self.compliance_tests)
    }

    /// `prev -> current` for tfstate entries that have a previous result.
    pub fn compliance_change_label(&self) -> String {
        if self.kind == LogKind::Tfstate && self.compliance_tests_prev > 0 {
            format!(
                "{} -> {}",
                validation_label(self.compliance_errors_prev, self.compliance_tests_prev),
                self.result_label()
            )
        } else {
            self.result_label()
        }
    }

    pub fn lines_changed_label(&self) -> String {
        format!("+{} -{}", self.lines_added, self.lines_removed)
    }
}

pub fn validation_label(errors: u32, tests: u32) -> String {
    if errors == 0 {
        format!("PASSING {}/{}", tests, tests)
    } else {
        format!("FAILING {}/{}", tests.saturating_sub(errors), tests)
    }
}

impl Record for LogEntry {
    const COLLECTION: &'static str = "/logs";
    const LABEL: &'static str = "log";

    fn id(&self) -> &RecordId {
        &self.id
    }
}
