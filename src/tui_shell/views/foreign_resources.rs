use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Style};
use ratatui::widgets::{List, ListItem, ListState};

use super::super::{ActionCtx, KeyOutcome, RenderCtx, Tab, View, fmt_unix_since, render_view_chrome};
use super::RecordTable;
use crate::model::ForeignResource;

pub(in crate::tui_shell) struct ForeignResourcesView {
    pub(in crate::tui_shell) table: RecordTable<ForeignResource>,
}

impl ForeignResourcesView {
    pub(in crate::tui_shell) fn new() -> Self {
        Self {
            table: RecordTable::new(),
        }
    }
}

impl View for ForeignResourcesView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn tab(&self) -> Tab {
        Tab::ForeignResources
    }

    fn updated_at(&self) -> &str {
        &self.table.updated_at
    }

    fn hints(&self) -> &'static str {
        "r refresh"
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

    fn handle_key(&mut self, key: KeyEvent, ctx: &ActionCtx) -> KeyOutcome {
        match key.code {
            KeyCode::Char('r') => {
                self.refresh(ctx);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, ctx: &RenderCtx) {
        let inner = render_view_chrome(frame, Tab::ForeignResources.title(), self.updated_at(), area);
        let rows = self.table.rows();
        let mut state = ListState::default();
        state.select(self.table.cursor(rows.len()));

        let mut items: Vec<ListItem> = rows
            .iter()
            .map(|t| {
                let r = &t.record;
                let (note, color) = if r.is_exception {
                    (" (exception)", Color::Gray)
                } else {
                    ("", Color::White)
                };
                ListItem::new(format!(
                    "{:<12} {:<28} {}{}",
                    fmt_unix_since(r.timestamp, ctx.now),
                    r.resource_type,
                    r.resource_id,
                    note
                ))
                .style(Style::default().fg(color))
            })
            .collect();
        if items.is_empty() {
            items.push(ListItem::new(self.table.empty_label()));
        }
        let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, inner, &mut state);
    }
}
