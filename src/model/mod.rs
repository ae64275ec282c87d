mod compliance;
mod config;
mod feature;
mod foreign_resource;
mod ids;
mod log_entry;
mod record;
mod tfstate;

pub use self::compliance::{ComplianceBreakdown, ComplianceResult, ComplianceVerdict};
pub use self::config::{
    DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_SECS, PanelConfig,
    SessionFile,
};
pub use self::feature::Feature;
pub use self::foreign_resource::ForeignResource;
pub use self::ids::RecordId;
pub use self::log_entry::{LogEntry, LogKind, validation_label};
pub use self::record::Record;
pub use self::tfstate::TfState;

#[cfg(test)]
#[path = "../tests/model/records_tests.rs"]
mod tests;
