use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use super::login::{LoginAction, LoginScreen};
use super::modal::{self, Modal};
use super::views::{FeaturesView, ForeignResourcesView, LogsView, TfStatesView};
use super::{ActionCtx, KeyOutcome, Tab, View, now_ts};
use crate::forms::FieldError;
use crate::model::RecordId;
use crate::panel::Panel;
use crate::remote::Method;
use crate::session::{AuthState, ReloadEvent, ReloadReason};

/// Completion of background work, delivered to the UI thread.
#[derive(Debug)]
pub(super) enum UiEvent {
    Status(String),
    Error(String),
    LoginFinished(Result<(), String>),
    FormSaved(Tab),
    FormRejected(FieldError),
    FormFailed(String),
    Viewer { title: String, lines: Vec<String> },
    Refresh(Tab),
}

/// Tags events with the screen generation they were started under.
#[derive(Clone, Debug)]
pub(super) struct UiSender {
    tx: mpsc::UnboundedSender<(u64, UiEvent)>,
    generation: u64,
}

impl UiSender {
    pub(super) fn send(&self, event: UiEvent) {
        // The receiver only goes away when the app exits.
        let _ = self.tx.send((self.generation, event));
    }
}

pub(super) struct Dashboard {
    pub(super) views: Vec<Box<dyn View>>,
    pub(super) active: usize,
}

impl Dashboard {
    fn open(ctx: &ActionCtx) -> Self {
        let mut views: Vec<Box<dyn View>> = vec![
            Box::new(TfStatesView::new(ctx)),
            Box::new(LogsView::new()),
            Box::new(FeaturesView::new()),
            Box::new(ForeignResourcesView::new()),
        ];
        for v in &mut views {
            v.refresh(ctx);
        }
        Self { views, active: 0 }
    }

    pub(super) fn view(&self) -> &dyn View {
        self.views[self.active].as_ref()
    }

    fn view_mut(&mut self) -> &mut dyn View {
        self.views[self.active].as_mut()
    }

    pub(super) fn view_for(&mut self, tab: Tab) -> Option<&mut Box<dyn View>> {
        self.views.iter_mut().find(|v| v.tab() == tab)
    }

    pub(super) fn select(&mut self, tab: Tab) {
        if let Some(i) = self.views.iter().position(|v| v.tab() == tab) {
            self.active = i;
        }
    }
}

pub(super) enum Screen {
    Login(LoginScreen),
    Dashboard(Dashboard),
}

#[derive(Clone, Debug)]
pub(super) struct StatusLine {
    pub(super) ts: String,
    pub(super) text: String,
    pub(super) is_error: bool,
}

pub(super) struct App {
    pub(super) panel: Panel,
    pub(super) screen: Screen,
    pub(super) modal: Option<Modal>,
    pub(super) last_result: Option<StatusLine>,
    pub(super) quit: bool,

    // Bumped whenever the screen is rebuilt; events from older screens are dropped.
    generation: u64,
    events_tx: mpsc::UnboundedSender<(u64, UiEvent)>,
    events_rx: mpsc::UnboundedReceiver<(u64, UiEvent)>,
    reloads: watch::Receiver<Option<ReloadEvent>>,
}

impl App {
    /// Must be called within a tokio runtime context.
    pub(super) fn new(panel: Panel) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let reloads = panel.session.subscribe();
        let mut app = Self {
            panel,
            screen: Screen::Login(LoginScreen::default()),
            modal: None,
            last_result: None,
            quit: false,
            generation: 0,
            events_tx,
            events_rx,
            reloads,
        };
        match app.panel.session.auth_state() {
            AuthState::Authenticated => app.enter_dashboard(),
            AuthState::Unauthenticated => app.show_login(None),
        }
        app
    }

    pub(super) fn action_ctx(&self) -> ActionCtx {
        ActionCtx {
            client: self.panel.client.clone(),
            events: UiSender {
                tx: self.events_tx.clone(),
                generation: self.generation,
            },
            poll_interval: self.panel.config.poll_interval(),
        }
    }

    pub(super) fn is_authenticated(&self) -> bool {
        matches!(self.screen, Screen::Dashboard(_))
    }

    pub(super) fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        match &mut self.screen {
            Screen::Dashboard(d) => Some(d),
            Screen::Login(_) => None,
        }
    }

    fn next_generation(&mut self) {
        self.generation += 1;
        self.modal = None;
        // Drop the old screen first so its pollers stop before new ones start.
        self.screen = Screen::Login(LoginScreen::default());
    }

    pub(super) fn enter_dashboard(&mut self) {
        self.next_generation();
        let ctx = self.action_ctx();
        self.screen = Screen::Dashboard(Dashboard::open(&ctx));
    }

    pub(super) fn show_login(&mut self, notice: Option<String>) {
        self.next_generation();
        self.screen = Screen::Login(LoginScreen::with_notice(notice));
    }

    /// Picks up a reload requested by the session (401, missing credential, logout).
    pub(super) fn poll_reload(&mut self) -> bool {
        if !self.reloads.has_changed().unwrap_or(false) {
            return false;
        }
        let event = *self.reloads.borrow_and_update();
        match event {
            Some(event) => {
                self.reload(event);
                true
            }
            None => false,
        }
    }

    /// Discards all state and re-derives the screen from the credential store.
    pub(super) fn reload(&mut self, event: ReloadEvent) {
        info!(generation = event.generation, reason = ?event.reason, "reloading dashboard");
        self.next_generation();
        match self.panel.session.rederive() {
            Ok(AuthState::Authenticated) => self.enter_dashboard(),
            Ok(AuthState::Unauthenticated) => {
                let notice = match event.reason {
                    ReloadReason::Unauthorized => "Your session expired. Please log in again.",
                    ReloadReason::MissingCredential => "Please log in.",
                    ReloadReason::LoggedOut => "Logged out.",
                };
                self.show_login(Some(notice.to_string()));
            }
            Err(err) => {
                warn!(error = %format!("{:#}", err), "re-read stored credential");
                self.show_login(Some(format!("{:#}", err)));
            }
        }
    }

    pub(super) fn drain_events(&mut self) {
        while let Ok((generation, event)) = self.events_rx.try_recv() {
            if generation != self.generation {
                continue;
            }
            self.apply_event(event);
        }
    }

    pub(super) fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Status(text) => self.push_status(text),
            UiEvent::Error(text) => self.push_error(text),
            UiEvent::LoginFinished(Ok(())) => {
                self.enter_dashboard();
                self.push_status("logged in".to_string());
            }
            UiEvent::LoginFinished(Err(message)) => {
                if let Screen::Login(login) = &mut self.screen {
                    login.rejected(message);
                }
            }
            UiEvent::FormSaved(tab) => {
                self.modal = None;
                self.refresh(tab);
                self.push_status("saved".to_string());
            }
            UiEvent::FormRejected(err) => {
                if let Some(form) = self.modal.as_mut().and_then(Modal::form_mut) {
                    form.set_field_error(err);
                }
            }
            UiEvent::FormFailed(message) => {
                if let Some(form) = self.modal.as_mut().and_then(Modal::form_mut) {
                    form.saving = false;
                    form.failure = Some(message);
                }
            }
            UiEvent::Viewer { title, lines } => {
                if self.modal.is_none() {
                    self.modal = Some(Modal::viewer(title, lines));
                }
            }
            UiEvent::Refresh(tab) => self.refresh(tab),
        }
    }

    fn refresh(&mut self, tab: Tab) {
        let ctx = self.action_ctx();
        if let Some(view) = self.dashboard_mut().and_then(|d| d.view_for(tab)) {
            view.refresh(&ctx);
        }
    }

    pub(super) fn delete_record(&mut self, tab: Tab, id: &RecordId) {
        let ctx = self.action_ctx();
        if let Some(view) = self.dashboard_mut().and_then(|d| d.view_for(tab)) {
            view.delete(id, &ctx);
        }
    }

    pub(super) fn push_status(&mut self, text: String) {
        self.last_result = Some(StatusLine {
            ts: now_ts(),
            text,
            is_error: false,
        });
    }

    pub(super) fn push_error(&mut self, text: String) {
        self.last_result = Some(StatusLine {
            ts: now_ts(),
            text,
            is_error: true,
        });
    }

    fn start_login(&mut self, username: String, password: String) {
        let gateway = self.panel.gateway().clone();
        let events = self.action_ctx().events;
        tokio::spawn(async move {
            let res = gateway
                .login(&username, &password)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string());
            events.send(UiEvent::LoginFinished(res));
        });
    }

    /// Revokes the token server-side, then forgets it locally either way.
    fn logout(&mut self) {
        let session = self.panel.session.clone();
        self.panel.gateway().dispatch::<serde::de::IgnoredAny, _, _>(
            Method::Delete,
            "/session",
            None,
            |_| {},
            move || {
                if let Err(err) = session.logout() {
                    warn!(error = %format!("{:#}", err), "logout");
                }
            },
        );
        self.push_status("logging out...".to_string());
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        if self.modal.is_some() {
            modal::handle_modal_key(self, key);
            return;
        }

        if let Screen::Login(login) = &mut self.screen {
            match login.handle_key(key) {
                LoginAction::None => {}
                LoginAction::Quit => self.quit = true,
                LoginAction::Submit { username, password } => self.start_login(username, password),
            }
            return;
        }

        let ctx = self.action_ctx();
        let Some(dash) = self.dashboard_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => dash.active = (dash.active + 1) % dash.views.len(),
            KeyCode::BackTab => {
                dash.active = (dash.active + dash.views.len() - 1) % dash.views.len()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                dash.select(Tab::ALL[idx]);
            }
            KeyCode::Up | KeyCode::Char('k') => dash.view_mut().move_up(),
            KeyCode::Down | KeyCode::Char('j') => dash.view_mut().move_down(),
            KeyCode::Char('L') => self.logout(),
            _ => match dash.view_mut().handle_key(key, &ctx) {
                KeyOutcome::Ignored | KeyOutcome::Handled => {}
                KeyOutcome::Modal(m) => self.modal = Some(m),
                KeyOutcome::Status(s) => self.push_status(s),
                KeyOutcome::Error(e) => self.push_error(e),
            },
        }
    }
}
