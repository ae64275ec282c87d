use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Update the stored configuration
    Set {
        #[arg(long)]
        base_url: Option<String>,
        /// How often pending records are re-fetched
        #[arg(long)]
        poll_interval_ms: Option<u64>,
        #[arg(long)]
        request_timeout_secs: Option<u64>,
    },
}
