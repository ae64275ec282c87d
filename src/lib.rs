pub mod forms;
pub mod logging;
pub mod model;
pub mod panel;
pub mod remote;
pub mod session;
pub mod store;
pub mod sync;
pub mod tui;
mod tui_shell;
