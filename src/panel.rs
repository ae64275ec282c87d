use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::model::PanelConfig;
use crate::remote::{Gateway, RecordClient};
use crate::session::{FileCredentialStore, SessionContext};
use crate::store::ConfigStore;

/// Everything a command or the dashboard needs to talk to one panel.
#[derive(Clone, Debug)]
pub struct Panel {
    pub store: ConfigStore,
    pub config: PanelConfig,
    pub session: SessionContext,
    pub client: RecordClient,
}

impl Panel {
    /// Opens the config dir (default: platform config dir) and loads the stored session.
    /// `url` overrides `base_url` for this process only.
    pub fn open(config_dir: Option<PathBuf>, url: Option<String>) -> Result<Self> {
        let root = match config_dir {
            Some(dir) => dir,
            None => ConfigStore::default_dir()?,
        };
        let store = ConfigStore::open_or_init(&root)?;
        let mut config = store.read_config()?;
        if let Some(url) = url {
            config.base_url = url;
        }

        let credentials = Arc::new(FileCredentialStore::new(store.clone()));
        let session = SessionContext::load(credentials).context("load session")?;
        let gateway = Gateway::new(&config.base_url, session.clone(), config.request_timeout())?;
        Ok(Self {
            store,
            config,
            session,
            client: RecordClient::new(gateway),
        })
    }

    pub fn gateway(&self) -> &Gateway {
        self.client.gateway()
    }
}
