use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use super::routes::app_router;
use super::types::AppState;

#[derive(Parser)]
#[command(name = "tfmon-devserver")]
#[command(about = "In-memory tfmon API server (development)", long_about = None)]
pub(super) struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    #[arg(long, default_value = "admin")]
    user: String,

    #[arg(long, default_value = "admin")]
    password: String,

    /// How long a requested validation stays pending
    #[arg(long, default_value_t = 1500)]
    validation_delay_ms: u64,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    tfmon::logging::init_stderr("tfmon_devserver=info,tfmon=info")?;

    let state = Arc::new(AppState::new(
        args.user,
        args.password,
        Duration::from_millis(args.validation_delay_ms),
    ));
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    info!(addr = %local_addr, "tfmon-devserver listening");

    // Tests pass `--addr 127.0.0.1:0` and read the bound port from here.
    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
