use anyhow::Result;
use tokio::runtime::Handle;

use crate::panel::Panel;

/// Runs the dashboard on the current thread; background requests go to `runtime`.
pub fn run(panel: Panel, runtime: Handle) -> Result<()> {
    crate::tui_shell::run(panel, runtime)
}
