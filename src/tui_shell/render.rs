use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use time::OffsetDateTime;

use super::app::{App, Screen};
use super::{RenderCtx, Tab, fmt_ts_ui, modal};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    // Header
    let mut spans = vec![
        Span::styled("tfmon", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::raw(app.panel.config.base_url.as_str()),
    ];
    let (state, color) = if app.is_authenticated() {
        ("logged in", Color::Green)
    } else {
        ("logged out", Color::Red)
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(state, Style::default().fg(color)));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let mut hints = "Esc quit";
    match &app.screen {
        Screen::Login(login) => login.render(frame, chunks[1], &app.panel.config.base_url),
        Screen::Dashboard(dash) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(chunks[1]);
            let titles: Vec<String> = Tab::ALL
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{} {}", i + 1, t.title()))
                .collect();
            frame.render_widget(
                Tabs::new(titles)
                    .select(dash.view().tab().index())
                    .highlight_style(Style::default().fg(Color::Yellow)),
                parts[0],
            );

            let ctx = RenderCtx {
                now: OffsetDateTime::now_utc(),
            };
            dash.view().render(frame, parts[1], &ctx);
            hints = dash.view().hints();
        }
    }

    // Status / last result
    let mut lines = Vec::new();
    if let Some(r) = &app.last_result {
        let style = if r.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", fmt_ts_ui(&r.ts)), Style::default().fg(Color::Gray)),
            Span::styled(r.text.as_str(), style),
        ]));
    }
    lines.push(Line::from(Span::styled(
        if app.is_authenticated() {
            format!("{}  Tab/1-4 switch  L logout  q quit", hints)
        } else {
            hints.to_string()
        },
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );

    if let Some(m) = &app.modal {
        modal::draw_modal(frame, m);
    }
}
