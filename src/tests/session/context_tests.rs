use std::sync::Arc;

use super::*;
use crate::session::MemoryCredentialStore;

fn cred(s: &str) -> Credential {
    Credential::new(s).expect("non-empty token")
}

#[test]
fn load_picks_up_stored_credential() {
    let store = Arc::new(MemoryCredentialStore::with(cred("tok")));
    let session = SessionContext::load(store).expect("load");
    assert_eq!(session.auth_state(), AuthState::Authenticated);
    let active = session.active().expect("active credential");
    assert_eq!(active.credential.bearer(), "Bearer tok");
}

#[test]
fn blank_tokens_are_not_credentials() {
    assert!(Credential::new("   ").is_none());
    assert_eq!(format!("{:?}", cred("secret")), "Credential(***)");
}

#[test]
fn login_persists_and_advances_epoch() {
    let store = Arc::new(MemoryCredentialStore::default());
    let session = SessionContext::new(store.clone());
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);

    let before = session.epoch();
    let epoch = session.login(cred("abc")).expect("login");
    assert!(epoch > before);
    assert!(session.is_current(epoch));
    assert_eq!(
        store.load().expect("load").map(|c| c.expose().to_string()),
        Some("abc".to_string())
    );
}

#[test]
fn invalidate_clears_store_and_broadcasts_reload() {
    let store = Arc::new(MemoryCredentialStore::default());
    let session = SessionContext::new(store.clone());
    let rx = session.subscribe();
    let epoch = session.login(cred("abc")).expect("login");

    assert!(session.invalidate(epoch));
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    assert!(store.load().expect("load").is_none());
    assert!(!session.is_current(epoch));

    let ev = (*rx.borrow()).expect("reload event");
    assert_eq!(ev.reason, ReloadReason::Unauthorized);
    assert_eq!(ev.generation, 1);
}

#[test]
fn stale_unauthorized_does_not_log_out_a_fresh_session() {
    let store = Arc::new(MemoryCredentialStore::default());
    let session = SessionContext::new(store.clone());
    let old = session.login(cred("old")).expect("login");
    let fresh = session.login(cred("fresh")).expect("re-login");

    assert!(!session.invalidate(old));
    assert!(session.is_current(fresh));
    assert_eq!(
        session.active().map(|a| a.credential.expose().to_string()),
        Some("fresh".to_string())
    );
    assert!(session.last_reload().is_none());
}

#[test]
fn logout_clears_and_reloads() {
    let store = Arc::new(MemoryCredentialStore::with(cred("tok")));
    let session = SessionContext::load(store.clone()).expect("load");
    session.logout().expect("logout");
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    assert_eq!(
        session.last_reload().map(|e| e.reason),
        Some(ReloadReason::LoggedOut)
    );
    assert_eq!(session.rederive().expect("rederive"), AuthState::Unauthenticated);
}

/// Signals when `clear` starts, then holds it open for a moment.
struct SlowClear {
    inner: MemoryCredentialStore,
    clearing: std::sync::mpsc::Sender<()>,
}

impl CredentialStore for SlowClear {
    fn load(&self) -> Result<Option<Credential>> {
        self.inner.load()
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        self.inner.save(credential)
    }

    fn clear(&self) -> Result<()> {
        let _ = self.clearing.send(());
        std::thread::sleep(std::time::Duration::from_millis(50));
        self.inner.clear()
    }
}

#[test]
fn login_racing_an_unauthorized_reset_keeps_the_new_token() {
    let (tx, clearing) = std::sync::mpsc::channel();
    let store = Arc::new(SlowClear {
        inner: MemoryCredentialStore::default(),
        clearing: tx,
    });
    let session = SessionContext::new(store.clone());
    let old = session.login(cred("old")).expect("login");

    let resetter = {
        let session = session.clone();
        std::thread::spawn(move || session.invalidate(old))
    };
    clearing.recv().expect("clear started");
    let fresh = session.login(cred("fresh")).expect("re-login");

    assert!(resetter.join().expect("join"));
    assert!(session.is_current(fresh));
    assert_eq!(
        store.load().expect("load").map(|c| c.expose().to_string()),
        Some("fresh".to_string())
    );
    assert_eq!(session.auth_state(), AuthState::Authenticated);
}
