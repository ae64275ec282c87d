use std::any::Any;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};
use time::OffsetDateTime;

use super::{Modal, UiSender, fmt_ts_ui};
use crate::remote::RecordClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Tab {
    TfStates,
    Logs,
    Features,
    ForeignResources,
}

impl Tab {
    pub(super) const ALL: [Tab; 4] = [
        Tab::TfStates,
        Tab::Logs,
        Tab::Features,
        Tab::ForeignResources,
    ];

    pub(super) fn title(self) -> &'static str {
        match self {
            Tab::TfStates => "TF states",
            Tab::Logs => "Logs",
            Tab::Features => "Features",
            Tab::ForeignResources => "Foreign resources",
        }
    }

    pub(super) fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct RenderCtx {
    pub(super) now: OffsetDateTime,
}

/// What a view needs to start background work.
#[derive(Clone)]
pub(super) struct ActionCtx {
    pub(super) client: RecordClient,
    pub(super) events: UiSender,
    pub(super) poll_interval: Duration,
}

pub(super) enum KeyOutcome {
    Ignored,
    Handled,
    Modal(Modal),
    Status(String),
    Error(String),
}

pub(super) trait View: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn tab(&self) -> Tab;
    fn updated_at(&self) -> &str;
    fn hints(&self) -> &'static str;

    fn move_up(&mut self) {}
    fn move_down(&mut self) {}

    /// Re-fetches the whole collection.
    fn refresh(&mut self, ctx: &ActionCtx);

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &ActionCtx) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    /// Sends the delete request for a confirmed row.
    fn delete(&mut self, _id: &crate::model::RecordId, _ctx: &ActionCtx) {}

    fn render(&self, frame: &mut ratatui::Frame, area: Rect, ctx: &RenderCtx);
}

pub(super) fn render_view_chrome(
    frame: &mut ratatui::Frame,
    title: &str,
    updated_at: &str,
    area: Rect,
) -> Rect {
    let header = Line::from(vec![
        Span::styled(title.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(fmt_ts_ui(updated_at), Style::default().fg(Color::Gray)),
    ]);

    let outer = Block::default().borders(Borders::ALL).title(header);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}
