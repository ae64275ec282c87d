use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::super::{ActionCtx, KeyOutcome, Modal, RenderCtx, Tab, UiEvent, View, render_view_chrome};
use super::RecordTable;
use crate::forms::{self, FeatureDraft, join_tags};
use crate::model::{Feature, RecordId};

pub(in crate::tui_shell) struct FeaturesView {
    pub(in crate::tui_shell) table: RecordTable<Feature>,
}

impl FeaturesView {
    pub(in crate::tui_shell) fn new() -> Self {
        Self {
            table: RecordTable::new(),
        }
    }

    fn toggle_selected(&self, ctx: &ActionCtx) -> KeyOutcome {
        let Some(row) = self.table.selected_row() else {
            return KeyOutcome::Handled;
        };
        let client = ctx.client.clone();
        let events = ctx.events.clone();
        tokio::spawn(async move {
            match forms::toggle_feature(&client, &row.record).await {
                Ok(disabled) => {
                    let state = if disabled { "disabled" } else { "enabled" };
                    events.send(UiEvent::Status(format!("{} {}", row.record.name, state)));
                    events.send(UiEvent::Refresh(Tab::Features));
                }
                Err(err) => events.send(UiEvent::Error(err.to_string())),
            }
        });
        KeyOutcome::Handled
    }
}

impl View for FeaturesView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn tab(&self) -> Tab {
        Tab::Features
    }

    fn updated_at(&self) -> &str {
        &self.table.updated_at
    }

    fn hints(&self) -> &'static str {
        "t toggle  a add  d delete  Enter source  r refresh"
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
            KeyCode::Char('t') => self.toggle_selected(ctx),
            KeyCode::Char('a') => KeyOutcome::Modal(Modal::feature_form(FeatureDraft::default())),
            KeyCode::Char('d') => match self.table.selected_row() {
                Some(row) => KeyOutcome::Modal(Modal::confirm_delete(
                    Tab::Features,
                    row.record.id.clone(),
                    format!("feature {}", row.record.name),
                )),
                None => KeyOutcome::Handled,
            },
            KeyCode::Enter => match self.table.selected_row() {
                Some(row) => KeyOutcome::Modal(Modal::viewer(
                    row.record.name.clone(),
                    row.record.source.lines().map(str::to_string).collect(),
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
        let inner = render_view_chrome(frame, Tab::Features.title(), self.updated_at(), area);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        let rows = self.table.rows();
        let mut state = ListState::default();
        state.select(self.table.cursor(rows.len()));

        let mut items: Vec<ListItem> = rows
            .iter()
            .map(|t| {
                let f = &t.record;
                let color = if f.disabled { Color::Gray } else { Color::White };
                ListItem::new(format!(
                    "{:<30} {:<9} {}",
                    f.name,
                    f.state_label(),
                    join_tags(&f.tags)
                ))
                .style(Style::default().fg(color))
            })
            .collect();
        if items.is_empty() {
            items.push(ListItem::new(self.table.empty_label()));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::BOTTOM))
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, parts[0], &mut state);

        let source: Vec<Line> = match self.table.cursor(rows.len()) {
            Some(idx) => rows[idx].record.source.lines().map(Line::from).collect(),
            None => vec![Line::from("(no selection)")],
        };
        frame.render_widget(Paragraph::new(source).wrap(Wrap { trim: false }), parts[1]);
    }
}
