use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::runtime::Runtime;

use tfmon::model::{Feature, ForeignResource, LogEntry, RecordId, TfState};
use tfmon::panel::Panel;

use crate::Commands;
use crate::cli_commands::session::LoginArgs;
use crate::cli_commands::{
    ConfigCommands, FeatureCommands, ForeignResourceCommands, LogCommands, TfStateCommands,
};

mod config;
mod dispatch;
mod features;
mod logs;
mod session;
mod tfstates;

pub(super) fn handle_command(runtime: &Runtime, panel: &Panel, command: Commands) -> Result<()> {
    dispatch::handle_command(runtime, panel, command)
}

fn print_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {} json", what))?
    );
    Ok(())
}
