pub(super) mod features;
pub(super) mod foreign_resources;
pub(super) mod logs;
pub(super) mod table;
pub(super) mod tfstates;

pub(in crate::tui_shell) use features::FeaturesView;
pub(in crate::tui_shell) use foreign_resources::ForeignResourcesView;
pub(in crate::tui_shell) use logs::LogsView;
pub(in crate::tui_shell) use table::RecordTable;
pub(in crate::tui_shell) use tfstates::TfStatesView;
