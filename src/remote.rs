use std::time::Duration;

use anyhow::{Context, Result};

use crate::session::SessionContext;

mod http_client;
mod login;
mod records;
mod types;

pub use self::login::LoginError;
pub use self::records::RecordClient;
pub use self::types::*;

/// Authenticated request gateway: every call to the REST API goes through here.
#[derive(Clone, Debug)]
pub struct Gateway {
    base_url: String,
    session: SessionContext,
    client: reqwest::Client,
}

impl Gateway {
    pub fn new(base_url: &str, session: SessionContext, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tfmon")
            .timeout(timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
