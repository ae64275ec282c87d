use clap::Args;

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "TFMON_USER")]
    pub(crate) username: String,
    /// Read from stdin when not given
    #[arg(long, env = "TFMON_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}
