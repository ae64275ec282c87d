use super::config::handle_config_command;
use super::features::{handle_features_command, handle_foreign_resources_command};
use super::logs::handle_logs_command;
use super::session::{handle_login_command, handle_logout_command};
use super::tfstates::handle_tfstates_command;
use super::*;

pub(super) fn handle_command(rt: &Runtime, panel: &Panel, command: Commands) -> Result<()> {
    match command {
        Commands::Tui => tfmon::tui::run(panel.clone(), rt.handle().clone())?,
        Commands::Config { command } => handle_config_command(panel, command)?,
        Commands::Login(args) => handle_login_command(rt, panel, args)?,
        Commands::Logout => handle_logout_command(rt, panel)?,
        Commands::TfStates { command } => handle_tfstates_command(rt, panel, command)?,
        Commands::Logs { command } => handle_logs_command(rt, panel, command)?,
        Commands::Features { command } => handle_features_command(rt, panel, command)?,
        Commands::ForeignResources { command } => {
            handle_foreign_resources_command(rt, panel, command)?
        }
    }
    Ok(())
}
