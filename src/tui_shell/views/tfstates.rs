use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::super::{ActionCtx, KeyOutcome, Modal, RenderCtx, Tab, View, render_view_chrome};
use super::RecordTable;
use crate::forms::{TfStateDraft, join_tags};
use crate::model::{ComplianceVerdict, RecordId, TfState};
use crate::sync::{Poller, PollerHandle, SyncStatus, TfStateValidation, Tracked, spawn_trigger};

pub(in crate::tui_shell) struct TfStatesView {
    pub(in crate::tui_shell) table: RecordTable<TfState>,
    pub(in crate::tui_shell) account_filter: Option<String>,
    validation: TfStateValidation,
    // Dropping the view stops polling.
    poller: PollerHandle,
}

impl TfStatesView {
    pub(in crate::tui_shell) fn new(ctx: &ActionCtx) -> Self {
        let table = RecordTable::new();
        let poller =
            Poller::new(ctx.client.clone(), table.records.clone()).start(ctx.poll_interval);
        Self {
            table,
            account_filter: None,
            validation: TfStateValidation::new(ctx.client.clone()),
            poller,
        }
    }

    pub(in crate::tui_shell) fn poller(&self) -> &PollerHandle {
        &self.poller
    }

    pub(in crate::tui_shell) fn visible_rows(&self) -> Vec<Tracked<TfState>> {
        let mut rows = self.table.rows();
        if let Some(account) = &self.account_filter {
            rows.retain(|t| &t.record.account == account);
        }
        rows
    }

    fn selected(&self) -> Option<Tracked<TfState>> {
        let rows = self.visible_rows();
        let idx = self.table.cursor(rows.len())?;
        rows.into_iter().nth(idx)
    }

    fn accounts(&self) -> Vec<String> {
        let mut accounts: Vec<String> = self
            .table
            .rows()
            .into_iter()
            .map(|t| t.record.account)
            .filter(|a| !a.is_empty())
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// All -> first account -> ... -> last account -> all.
    pub(in crate::tui_shell) fn cycle_account_filter(&mut self) {
        let accounts = self.accounts();
        self.account_filter = match &self.account_filter {
            None => accounts.first().cloned(),
            Some(current) => accounts
                .iter()
                .position(|a| a == current)
                .and_then(|i| accounts.get(i + 1))
                .cloned(),
        };
        self.table.selected = 0;
    }

    fn validate_selected(&mut self) -> KeyOutcome {
        let Some(row) = self.selected() else {
            return KeyOutcome::Handled;
        };
        match spawn_trigger(&self.table.records, &self.validation, &row.record.id) {
            Ok(_) => KeyOutcome::Status(format!("validation requested for {}", row.record.location())),
            Err(err) => KeyOutcome::Error(err.to_string()),
        }
    }
}

fn status_label(t: &Tracked<TfState>) -> &'static str {
    match t.status {
        SyncStatus::Idle if t.last_error.is_some() => "failed",
        SyncStatus::Idle => "",
        SyncStatus::PendingLocalEcho => "requesting",
        SyncStatus::PendingRemote => "validating",
    }
}

fn verdict_color(v: ComplianceVerdict) -> Color {
    match v {
        ComplianceVerdict::NotChecked => Color::Gray,
        ComplianceVerdict::Errored => Color::Red,
        ComplianceVerdict::Passing => Color::Green,
        ComplianceVerdict::Failing => Color::LightRed,
    }
}

fn detail_lines(t: &Tracked<TfState>) -> Vec<String> {
    let s = &t.record;
    let mut out = vec![
        format!("id: {}", s.id),
        format!("account: {}", s.account),
        format!("location: {}", s.location()),
        format!("tags: {}", join_tags(&s.tags)),
        format!("last update: {}", s.last_update_label()),
        format!("compliance: {}", s.compliance_result.label()),
    ];
    if t.status.is_busy() {
        out.push(format!("status: {}", status_label(t)));
    }
    if let Some(err) = &t.last_error {
        out.push(format!("last action failed: {}", err));
    }
    out.push(String::new());
    out.extend(s.compliance_result.detail_lines());
    out
}

impl View for TfStatesView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn tab(&self) -> Tab {
        Tab::TfStates
    }

    fn updated_at(&self) -> &str {
        &self.table.updated_at
    }

    fn hints(&self) -> &'static str {
        "v validate  a add  e edit  d delete  f account  Enter details  r refresh"
    }

    fn move_up(&mut self) {
        self.table.move_up();
    }

    fn move_down(&mut self) {
        let len = self.visible_rows().len();
        self.table.move_down(len);
    }

    fn refresh(&mut self, ctx: &ActionCtx) {
        self.table.refresh(ctx);
    }

    fn delete(&mut self, id: &RecordId, ctx: &ActionCtx) {
        self.table.delete(id, ctx);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &ActionCtx) -> KeyOutcome {
        match key.code {
            KeyCode::Char('v') => self.validate_selected(),
            KeyCode::Char('a') => KeyOutcome::Modal(Modal::tfstate_form(None, TfStateDraft::default())),
            KeyCode::Char('e') => match self.selected() {
                Some(row) => KeyOutcome::Modal(Modal::tfstate_form(
                    Some(row.record.id.clone()),
                    TfStateDraft::from_record(&row.record),
                )),
                None => KeyOutcome::Handled,
            },
            KeyCode::Char('d') => match self.selected() {
                Some(row) => KeyOutcome::Modal(Modal::confirm_delete(
                    Tab::TfStates,
                    row.record.id.clone(),
                    row.record.location(),
                )),
                None => KeyOutcome::Handled,
            },
            KeyCode::Char('f') => {
                self.cycle_account_filter();
                KeyOutcome::Status(format!(
                    "account filter: {}",
                    self.account_filter.as_deref().unwrap_or("all")
                ))
            }
            KeyCode::Enter => match self.selected() {
                Some(row) => KeyOutcome::Modal(Modal::viewer(row.record.location(), detail_lines(&row))),
                None => KeyOutcome::Handled,
            },
            KeyCode::Char('r') => {
                self.refresh(ctx);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, _ctx: &RenderCtx) {
        let inner = render_view_chrome(frame, Tab::TfStates.title(), self.updated_at(), area);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(inner);

        let rows = self.visible_rows();
        let mut state = ListState::default();
        state.select(self.table.cursor(rows.len()));

        let mut items = Vec::new();
        for t in &rows {
            let s = &t.record;
            let line = format!(
                "{:<12} {:<40} {:>7} {:<19} {}",
                s.account,
                s.location(),
                s.compliance_result.label(),
                s.last_update_label(),
                status_label(t)
            );
            items.push(
                ListItem::new(line)
                    .style(Style::default().fg(verdict_color(s.compliance_result.verdict()))),
            );
        }
        if items.is_empty() {
            items.push(ListItem::new(self.table.empty_label()));
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::BOTTOM).title(format!(
                "account={}",
                self.account_filter.as_deref().unwrap_or("all")
            )))
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, parts[0], &mut state);

        let details: Vec<Line> = match self.table.cursor(rows.len()) {
            Some(idx) => detail_lines(&rows[idx]).into_iter().map(Line::from).collect(),
            None => vec![Line::from("(no selection)")],
        };
        frame.render_widget(Paragraph::new(details).wrap(Wrap { trim: false }), parts[1]);
    }
}
