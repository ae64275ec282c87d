use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{PanelConfig, SessionFile};

const APP_DIR: &str = "tfmon";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";
const LOGS_DIR: &str = "logs";

/// On-disk home of the client: `config.json`, `session.json` and `logs/`.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    /// Platform config directory (e.g. `~/.config/tfmon`).
    pub fn default_dir() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow!("cannot determine a config directory (pass --config-dir)"))?;
        Ok(base.join(APP_DIR))
    }

    /// Opens `root`, creating it with a default config on first use.
    pub fn open_or_init(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("create config dir {}", root.display()))?;
        let store = Self {
            root: root.to_path_buf(),
        };
        if !store.config_path().exists() {
            store
                .write_config(&PanelConfig::default())
                .context("write default config")?;
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    pub fn read_config(&self) -> Result<PanelConfig> {
        let bytes = fs::read(self.config_path()).context("read config.json")?;
        let cfg: PanelConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &PanelConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_session(&self) -> Result<SessionFile> {
        let path = self.root.join(SESSION_FILE);
        if !path.exists() {
            return Ok(SessionFile {
                version: 1,
                token: None,
            });
        }
        let bytes = fs::read(&path).context("read session.json")?;
        let st: SessionFile = serde_json::from_slice(&bytes).context("parse session.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported session file version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_session(&self, st: &SessionFile) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize session")?;
        write_atomic(&self.root.join(SESSION_FILE), &bytes).context("write session.json")?;
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
