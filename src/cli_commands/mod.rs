use clap::Subcommand;

pub(crate) mod config;
pub(crate) mod records;
pub(crate) mod session;

pub(crate) use self::config::ConfigCommands;
pub(crate) use self::records::{
    FeatureCommands, ForeignResourceCommands, LogCommands, TfStateCommands,
};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Open the dashboard (default when no command is given)
    Tui,

    /// Show or change the client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Log in and store the session token
    Login(session::LoginArgs),

    /// Revoke the session token and forget it locally
    Logout,

    /// Tracked Terraform states
    #[command(name = "tfstates", alias = "tfstate")]
    TfStates {
        #[command(subcommand)]
        command: TfStateCommands,
    },

    /// Validation and state change log
    #[command(alias = "log")]
    Logs {
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Compliance features
    #[command(alias = "feature")]
    Features {
        #[command(subcommand)]
        command: FeatureCommands,
    },

    /// Resources found in accounts but not managed by any tracked state
    #[command(name = "foreign-resources")]
    ForeignResources {
        #[command(subcommand)]
        command: ForeignResourceCommands,
    },
}
