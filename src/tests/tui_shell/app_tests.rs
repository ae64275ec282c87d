use std::sync::Arc;
use std::time::Duration;

use super::app::{App, Screen, UiEvent};
use super::views::TfStatesView;
use super::{Tab, View};
use crate::model::PanelConfig;
use crate::panel::Panel;
use crate::remote::{Gateway, RecordClient};
use crate::session::{
    Credential, CredentialStore, MemoryCredentialStore, ReloadReason, SessionContext,
};
use crate::store::ConfigStore;

// Nothing listens on the discard port; requests fail fast with a transport error.
const DEAD_URL: &str = "http://127.0.0.1:9";

fn panel(dir: &tempfile::TempDir, store: Arc<dyn CredentialStore>) -> Panel {
    let session = SessionContext::load(store).expect("session");
    let gateway = Gateway::new(DEAD_URL, session.clone(), Duration::from_secs(1)).expect("gateway");
    Panel {
        store: ConfigStore::open_or_init(dir.path()).expect("config store"),
        config: PanelConfig {
            base_url: DEAD_URL.to_string(),
            ..PanelConfig::default()
        },
        session,
        client: RecordClient::new(gateway),
    }
}

fn logged_in_store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with(
        Credential::new("tok").expect("credential"),
    ))
}

fn login_notice(app: &App) -> Option<String> {
    match &app.screen {
        Screen::Login(login) => login.notice.clone(),
        Screen::Dashboard(_) => panic!("expected login screen"),
    }
}

#[tokio::test]
async fn starts_on_login_without_stored_credential() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = App::new(panel(&dir, Arc::new(MemoryCredentialStore::default())));
    assert!(!app.is_authenticated());
    assert_eq!(login_notice(&app), None);
}

#[tokio::test]
async fn stored_credential_opens_dashboard_with_polling_tfstates_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = App::new(panel(&dir, logged_in_store()));
    assert!(app.is_authenticated());

    let dash = app.dashboard_mut().expect("dashboard");
    let tabs: Vec<Tab> = dash.views.iter().map(|v| v.tab()).collect();
    assert_eq!(tabs, Tab::ALL.to_vec());
    let tfstates = dash
        .view_for(Tab::TfStates)
        .and_then(|v| v.as_any().downcast_ref::<TfStatesView>())
        .expect("tfstates view");
    assert!(tfstates.poller().is_running());
}

#[tokio::test]
async fn unauthorized_reload_returns_to_login_with_notice() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = logged_in_store();
    let p = panel(&dir, store.clone());
    let session = p.session.clone();
    let mut app = App::new(p);
    assert!(app.is_authenticated());

    assert!(session.invalidate(session.epoch()));
    assert!(app.poll_reload());

    assert!(!app.is_authenticated());
    assert_eq!(
        login_notice(&app).as_deref(),
        Some("Your session expired. Please log in again.")
    );
    assert!(store.load().expect("load").is_none());
    assert!(!app.poll_reload(), "reload is consumed once");
}

#[tokio::test]
async fn reload_with_surviving_credential_rebuilds_dashboard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let p = panel(&dir, logged_in_store());
    let session = p.session.clone();
    let mut app = App::new(p);

    session.request_reload(ReloadReason::MissingCredential);
    assert!(app.poll_reload());
    assert!(app.is_authenticated());
}

#[tokio::test]
async fn events_from_a_previous_screen_are_dropped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = App::new(panel(&dir, logged_in_store()));

    let old = app.action_ctx().events;
    app.enter_dashboard();
    old.send(UiEvent::Status("stale".to_string()));
    app.action_ctx().events.send(UiEvent::Status("fresh".to_string()));
    app.drain_events();

    assert_eq!(app.last_result.map(|r| r.text).as_deref(), Some("fresh"));
}

#[tokio::test]
async fn failed_login_keeps_username_and_clears_password() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = App::new(panel(&dir, Arc::new(MemoryCredentialStore::default())));
    if let Screen::Login(login) = &mut app.screen {
        login.username.set("alice".to_string());
        login.password.set("wrong".to_string());
        login.busy = true;
    }

    app.apply_event(UiEvent::LoginFinished(Err(
        "Invalid username or password.".to_string()
    )));

    match &app.screen {
        Screen::Login(login) => {
            assert_eq!(login.username.buf, "alice");
            assert!(login.password.buf.is_empty());
            assert!(!login.busy);
            assert_eq!(login.error.as_deref(), Some("Invalid username or password."));
        }
        Screen::Dashboard(_) => panic!("must stay on login"),
    }
}

#[tokio::test]
async fn modal_keys_route_through_the_app() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::Modal;
    use crate::model::RecordId;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = App::new(panel(&dir, logged_in_store()));

    app.modal = Some(Modal::confirm_delete(
        Tab::TfStates,
        RecordId::from("s1"),
        "states@s1.tfstate".to_string(),
    ));
    app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
    assert!(app.modal.is_some(), "unbound key keeps the dialog open");
    app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
    assert!(app.modal.is_none());

    app.modal = Some(Modal::viewer("details", vec!["a".to_string()]));
    app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert!(app.modal.is_none());
}
