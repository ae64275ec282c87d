#![allow(dead_code)]

use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "hunter2";

pub struct DevServer {
    pub base_url: String,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for DevServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_devserver(validation_delay_ms: u64) -> Result<DevServer> {
    let dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_tfmon-devserver"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--user",
            USER,
            "--password",
            PASSWORD,
            "--validation-delay-ms",
            &validation_delay_ms.to_string(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn tfmon-devserver")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(DevServer {
        base_url,
        _dir: dir,
        child,
    })
}

/// [`spawn_devserver`] for `#[tokio::test]` bodies. The health check uses
/// a blocking client, which must not be built or dropped on a runtime thread.
pub async fn spawn_devserver_async(validation_delay_ms: u64) -> Result<DevServer> {
    tokio::task::spawn_blocking(move || spawn_devserver(validation_delay_ms))
        .await
        .context("join devserver spawn")?
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// Runs the `tfmon` binary against `base_url` with its own config dir.
pub fn tfmon(config_dir: &Path, base_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tfmon"))
        .args(args)
        .env("TFMON_CONFIG_DIR", config_dir)
        .env("TFMON_URL", base_url)
        .env("TFMON_PASSWORD", PASSWORD)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("run tfmon")
}

pub fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

pub fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}
