use anyhow::Result;
use tokio::runtime::Handle;

use crate::panel::Panel;

mod app;
mod event_loop;
mod input;
mod login;
mod modal;
mod render;
mod runtime;
mod time_fmt;
mod view;
mod views;

// Make core TUI types/helpers available to submodules via `super::...`.
use app::{App, UiEvent, UiSender};
use input::Input;
use modal::Modal;
use time_fmt::{fmt_ts_ui, fmt_unix, fmt_unix_since, now_ts};
use view::{ActionCtx, KeyOutcome, RenderCtx, Tab, View, render_view_chrome};

pub(crate) fn run(panel: Panel, runtime: Handle) -> Result<()> {
    runtime::run(panel, runtime)
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod app_tests;
