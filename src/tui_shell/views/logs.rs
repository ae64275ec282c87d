use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use super::super::{
    ActionCtx, KeyOutcome, Modal, RenderCtx, Tab, UiEvent, View, fmt_unix, render_view_chrome,
};
use super::RecordTable;
use crate::model::{LogEntry, LogKind, Record, RecordId};
use crate::remote::Method;

pub(in crate::tui_shell) struct LogsView {
    pub(in crate::tui_shell) table: RecordTable<LogEntry>,
}

impl LogsView {
    pub(in crate::tui_shell) fn new() -> Self {
        Self {
            table: RecordTable::new(),
        }
    }

    fn open_details(&self, ctx: &ActionCtx) -> KeyOutcome {
        let Some(row) = self.table.selected_row() else {
            return KeyOutcome::Handled;
        };
        let events = ctx.events.clone();
        ctx.client.gateway().dispatch::<LogEntry, _, _>(
            Method::Get,
            LogEntry::item_path(&row.record.id),
            None,
            move |entry| {
                events.send(UiEvent::Viewer {
                    title: format!("log {}", entry.id.short()),
                    lines: detail_lines(&entry),
                });
            },
            || {},
        );
        KeyOutcome::Status("loading log entry...".to_string())
    }
}

pub(in crate::tui_shell) fn detail_lines(e: &LogEntry) -> Vec<String> {
    let mut out = vec![
        format!("kind: {}", e.kind.label()),
        format!("time: {}", fmt_unix(e.timestamp)),
    ];
    if !e.details.is_empty() {
        out.push(format!("tfstate: {}", e.details));
    }
    out.push(format!("result: {}", e.compliance_change_label()));
    if e.kind == LogKind::Tfstate {
        out.push(format!("lines changed: {}", e.lines_changed_label()));
    }
    if let Some(features) = &e.compliance_features {
        out.push(String::new());
        out.push("features:".to_string());
        for (name, passed) in features {
            out.push(format!("  {} {}", if *passed { "ok  " } else { "FAIL" }, name));
        }
    }
    if let Some(fails) = &e.compliance_fail_messages {
        for (name, msgs) in fails {
            for m in msgs {
                out.push(format!("  {}: {}", name, m));
            }
        }
    }
    out
}

impl View for LogsView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn tab(&self) -> Tab {
        Tab::Logs
    }

    fn updated_at(&self) -> &str {
        &self.table.updated_at
    }

    fn hints(&self) -> &'static str {
        "Enter details  d delete  r refresh"
    }

    fn move_up(&mut self) {
        self.table.move_up();
    }

    fn move_down(&mut self) {
        let len = self.table.records.lock().len();
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
            KeyCode::Enter => self.open_details(ctx),
            KeyCode::Char('d') => match self.table.selected_row() {
                Some(row) => KeyOutcome::Modal(Modal::confirm_delete(
                    Tab::Logs,
                    row.record.id.clone(),
                    format!("log entry from {}", fmt_unix(row.record.timestamp)),
                )),
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
        let inner = render_view_chrome(frame, Tab::Logs.title(), self.updated_at(), area);
        let rows = self.table.rows();
        let mut state = ListState::default();
        state.select(self.table.cursor(rows.len()));

        let mut items: Vec<ListItem> = rows
            .iter()
            .map(|t| {
                let e = &t.record;
                let color = if e.compliance_errors == 0 {
                    Color::Green
                } else {
                    Color::LightRed
                };
                ListItem::new(format!(
                    "{:<17} {:<12} {:<28} {}",
                    fmt_unix(e.timestamp),
                    e.kind.label(),
                    e.compliance_change_label(),
                    e.details
                ))
                .style(Style::default().fg(color))
            })
            .collect();
        if items.is_empty() {
            items.push(ListItem::new(self.table.empty_label()));
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::NONE))
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, inner, &mut state);
    }
}
