use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{Credential, CredentialStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadReason {
    /// A request was attempted while no credential was held.
    MissingCredential,
    /// The server answered 401 to a request made with the current credential.
    Unauthorized,
    LoggedOut,
}

/// Broadcast when the application must discard its state and re-derive auth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadEvent {
    pub generation: u64,
    pub reason: ReloadReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Credential snapshot taken when a request is dispatched.
#[derive(Clone, Debug)]
pub struct ActiveCredential {
    pub credential: Credential,
    pub epoch: u64,
}

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    store: Arc<dyn CredentialStore>,
    reloads: watch::Sender<Option<ReloadEvent>>,
}

#[derive(Default)]
struct State {
    credential: Option<Credential>,
    epoch: u64,
    reload_generation: u64,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state();
        f.debug_struct("SessionContext")
            .field("authenticated", &st.credential.is_some())
            .field("epoch", &st.epoch)
            .finish()
    }
}

impl SessionContext {
    /// Starts unauthenticated; call [`SessionContext::rederive`] to pick up a stored credential.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (reloads, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                store,
                reloads,
            }),
        }
    }

    pub fn load(store: Arc<dyn CredentialStore>) -> Result<Self> {
        let session = Self::new(store);
        session.rederive()?;
        Ok(session)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-reads the credential store from scratch. This is what a reload does.
    pub fn rederive(&self) -> Result<AuthState> {
        let mut st = self.state();
        st.credential = self.inner.store.load().context("load stored credential")?;
        st.epoch += 1;
        Ok(auth_state_of(&st))
    }

    pub fn auth_state(&self) -> AuthState {
        auth_state_of(&self.state())
    }

    pub fn active(&self) -> Option<ActiveCredential> {
        let st = self.state();
        st.credential.clone().map(|credential| ActiveCredential {
            credential,
            epoch: st.epoch,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.state().epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.state().epoch == epoch
    }

    /// Login flow: persists the credential and starts a new epoch.
    pub fn login(&self, credential: Credential) -> Result<u64> {
        let mut st = self.state();
        self.inner
            .store
            .save(&credential)
            .context("persist credential")?;
        st.credential = Some(credential);
        st.epoch += 1;
        info!(epoch = st.epoch, "session established");
        Ok(st.epoch)
    }

    /// 401 handler. Clears the credential and requests a reload, unless the
    /// request was made under an epoch that is already gone.
    /// Store writes happen under the state lock, so a concurrent `login`
    /// is never wiped by a 401 from the session it replaced.
    pub fn invalidate(&self, epoch: u64) -> bool {
        let event = {
            let mut st = self.state();
            if st.epoch != epoch {
                return false;
            }
            if let Err(err) = self.inner.store.clear() {
                warn!(error = %format!("{:#}", err), "clear stored credential");
            }
            st.credential = None;
            begin_reload(&mut st, ReloadReason::Unauthorized)
        };
        warn!("credential rejected by server; resetting session");
        self.broadcast(event);
        true
    }

    pub fn logout(&self) -> Result<()> {
        let event = {
            let mut st = self.state();
            self.inner.store.clear().context("clear stored credential")?;
            st.credential = None;
            begin_reload(&mut st, ReloadReason::LoggedOut)
        };
        self.broadcast(event);
        Ok(())
    }

    /// Ends the current epoch and tells every subscriber to reset.
    pub fn request_reload(&self, reason: ReloadReason) {
        let event = begin_reload(&mut self.state(), reason);
        self.broadcast(event);
    }

    fn broadcast(&self, event: ReloadEvent) {
        info!(generation = event.generation, reason = ?event.reason, "reload requested");
        self.inner.reloads.send_replace(Some(event));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ReloadEvent>> {
        self.inner.reloads.subscribe()
    }

    pub fn last_reload(&self) -> Option<ReloadEvent> {
        *self.inner.reloads.borrow()
    }
}

fn begin_reload(st: &mut State, reason: ReloadReason) -> ReloadEvent {
    st.epoch += 1;
    st.reload_generation += 1;
    ReloadEvent {
        generation: st.reload_generation,
        reason,
    }
}

fn auth_state_of(st: &State) -> AuthState {
    if st.credential.is_some() {
        AuthState::Authenticated
    } else {
        AuthState::Unauthenticated
    }
}

#[cfg(test)]
#[path = "../tests/session/context_tests.rs"]
mod tests;
