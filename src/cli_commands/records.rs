use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum TfStateCommands {
    /// List tracked states with their last compliance result
    List {
        #[arg(long)]
        account: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one state and its per-feature results
    Show {
        id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Start tracking a state
    Add {
        #[arg(long)]
        account: String,
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        path: String,
        /// Comma-separated
        #[arg(long, default_value = "default")]
        tags: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a tracked state
    Edit {
        id: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        bucket: Option<String>,
        #[arg(long)]
        path: Option<String>,
        /// Comma-separated; replaces the current tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Stop tracking a state
    Delete { id: String },

    /// Ask the server to re-validate a state
    Validate {
        id: String,
        /// Poll until the server reports the validation finished
        #[arg(long)]
        wait: bool,
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum LogCommands {
    /// List log entries, newest first
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one entry with its per-feature results
    Show {
        id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    Delete { id: String },
}

#[derive(Subcommand)]
pub(crate) enum FeatureCommands {
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one feature including its source
    Show {
        id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a feature from inline source or a file
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, conflicts_with = "source_file")]
        source: Option<String>,
        #[arg(long, value_name = "PATH")]
        source_file: Option<PathBuf>,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        disabled: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Enable a disabled feature or disable an enabled one
    Toggle { id: String },

    Delete { id: String },
}

#[derive(Subcommand)]
pub(crate) enum ForeignResourceCommands {
    List {
        /// Only resources marked as exceptions
        #[arg(long)]
        exceptions: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}
