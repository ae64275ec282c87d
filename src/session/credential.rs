use std::fmt;
use std::sync::{Mutex, PoisonError};

use anyhow::Result;

use crate::model::SessionFile;
use crate::store::ConfigStore;

/// Opaque bearer token. Expiry is not visible to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank tokens.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>>;
    fn save(&self, credential: &Credential) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the token in `session.json` next to the client config.
pub struct FileCredentialStore {
    store: ConfigStore,
}

impl FileCredentialStore {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        let st = self.store.read_session()?;
        Ok(st.token.and_then(Credential::new))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        self.store.write_session(&SessionFile {
            version: 1,
            token: Some(credential.expose().to_string()),
        })
    }

    fn clear(&self) -> Result<()> {
        self.store.write_session(&SessionFile {
            version: 1,
            token: None,
        })
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn with(credential: Credential) -> Self {
        Self {
            token: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
