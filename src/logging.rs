//! Tracing subscriber setup.
//!
//! Commands log to stderr. The dashboard owns the terminal, so it logs to
//! `<config_dir>/logs/tfmon.log` through a non-blocking appender instead.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

pub const DEFAULT_DIRECTIVES: &str = "tfmon=info";
const LOG_FILE: &str = "tfmon.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `RUST_LOG` if set and valid, else `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_stderr(default: &str) -> Result<()> {
    let layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    registry()
        .with(env_filter(default))
        .with(layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

pub fn init_file(logs_dir: &Path, default: &str) -> Result<()> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("create log dir {}", logs_dir.display()))?;
    let appender = tracing_appender::rolling::never(logs_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    FILE_GUARD
        .set(guard)
        .map_err(|_| anyhow!("file logging already initialized"))?;

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);
    registry()
        .with(env_filter(default))
        .with(layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}
