use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Output of the compliance tool for one tfstate, as the API serializes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplianceResult {
    #[serde(default)]
    pub initialized: bool,

    #[serde(default)]
    pub error: bool,

    #[serde(default)]
    pub error_message: String,

    #[serde(default)]
    pub pass_count: u32,

    #[serde(default)]
    pub fail_count: u32,

    #[serde(default)]
    pub features_result: BTreeMap<String, bool>,

    #[serde(default)]
    pub features_failures: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplianceVerdict {
    NotChecked,
    Errored,
    Passing,
    Failing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplianceBreakdown {
    pub passing: Vec<String>,
    pub failing: Vec<String>,
    pub errors: Vec<String>,
}

impl ComplianceResult {
    pub fn verdict(&self) -> ComplianceVerdict {
        if !self.initialized {
            ComplianceVerdict::NotChecked
        } else if self.error {
            ComplianceVerdict::Errored
        } else if self.fail_count == 0 {
            ComplianceVerdict::Passing
        } else {
            ComplianceVerdict::Failing
        }
    }

    pub fn total(&self) -> u32 {
        self.pass_count + self.fail_count
    }

    /// Short table label: `-`, `error`, or `passing/total`.
    pub fn label(&self) -> String {
        match self.verdict() {
            ComplianceVerdict::NotChecked => "-".to_string(),
            ComplianceVerdict::Errored => "error".to_string(),
            ComplianceVerdict::Passing | ComplianceVerdict::Failing => {
                format!("{}/{}", self.pass_count, self.total())
            }
        }
    }

    pub fn breakdown(&self) -> ComplianceBreakdown {
        let mut out = ComplianceBreakdown::default();
        for (feature, passed) in &self.features_result {
            if *passed {
                out.passing.push(feature.clone());
            } else {
                out.failing.push(feature.clone());
            }
            if let Some(failures) = self.features_failures.get(feature) {
                for f in failures {
                    out.errors.push(format!("{}: {}", feature, f));
                }
            }
        }
        out
    }

    pub fn detail_lines(&self) -> Vec<String> {
        match self.verdict() {
            ComplianceVerdict::NotChecked => vec!["not checked yet".to_string()],
            ComplianceVerdict::Errored => self.error_message.lines().map(str::to_string).collect(),
            ComplianceVerdict::Passing | ComplianceVerdict::Failing => {
                let b = self.breakdown();
                let mut lines = Vec::new();
                for (title, items) in [
                    ("Passing:", &b.passing),
                    ("Failing:", &b.failing),
                    ("Errors:", &b.errors),
                ] {
                    if items.is_empty() {
                        continue;
                    }
                    lines.push(title.to_string());
                    lines.extend(items.iter().map(|i| format!("  - {}", i)));
                }
                lines
            }
        }
    }
}
