use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tfmon::logging;
use tfmon::panel::Panel;

use crate::Commands;

#[derive(Parser)]
#[command(name = "tfmon")]
#[command(about = "Terraform state compliance monitor", long_about = None)]
pub(crate) struct Cli {
    /// Client config directory (defaults to the platform config dir)
    #[arg(long, global = true, env = "TFMON_CONFIG_DIR", value_name = "PATH")]
    config_dir: Option<PathBuf>,

    /// Server base URL for this invocation (overrides the configured one)
    #[arg(long, global = true, env = "TFMON_URL", value_name = "URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    let panel = Panel::open(cli.config_dir, cli.url)?;
    if matches!(command, Commands::Tui) {
        logging::init_file(&panel.store.logs_dir(), logging::DEFAULT_DIRECTIVES)?;
    } else {
        logging::init_stderr("tfmon=warn")?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    crate::cli_exec::handle_command(&runtime, &panel, command)
}
