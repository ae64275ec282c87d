use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::Input;

#[derive(Debug, Default)]
pub(super) struct LoginScreen {
    pub(super) username: Input,
    pub(super) password: Input,
    pub(super) focus_password: bool,
    pub(super) notice: Option<String>,
    pub(super) error: Option<String>,
    pub(super) busy: bool,
}

pub(super) enum LoginAction {
    None,
    Submit { username: String, password: String },
    Quit,
}

impl LoginScreen {
    pub(super) fn with_notice(notice: Option<String>) -> Self {
        Self {
            notice,
            ..Self::default()
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.busy {
            return LoginAction::None;
        }
        let field = if self.focus_password {
            &mut self.password
        } else {
            &mut self.username
        };
        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus_password = !self.focus_password;
            }
            KeyCode::Enter => {
                if !self.focus_password {
                    self.focus_password = true;
                    return LoginAction::None;
                }
                let username = self.username.buf.trim().to_string();
                if username.is_empty() {
                    self.error = Some("Enter a username.".to_string());
                    self.focus_password = false;
                    return LoginAction::None;
                }
                self.busy = true;
                self.error = None;
                return LoginAction::Submit {
                    username,
                    password: self.password.buf.clone(),
                };
            }
            KeyCode::Char(c) => field.insert_char(c),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            _ => {}
        }
        LoginAction::None
    }

    /// Login failed: keep the username, clear the password.
    pub(super) fn rejected(&mut self, message: String) {
        self.busy = false;
        self.error = Some(message);
        self.password.clear();
        self.focus_password = true;
    }

    pub(super) fn render(&self, frame: &mut ratatui::Frame, area: Rect, base_url: &str) {
        let w = area.width.min(60);
        let h = area.height.min(14);
        let box_area = Rect {
            x: area.x + area.width.saturating_sub(w) / 2,
            y: area.y + area.height.saturating_sub(h) / 2,
            width: w,
            height: h,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Log in to {}", base_url));
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        if let Some(notice) = &self.notice {
            frame.render_widget(
                Paragraph::new(Span::styled(notice.as_str(), Style::default().fg(Color::Yellow))),
                parts[0],
            );
        }

        let focused = Style::default().fg(Color::Yellow);
        let username_style = if self.focus_password { Style::default() } else { focused };
        let password_style = if self.focus_password { focused } else { Style::default() };
        frame.render_widget(
            Paragraph::new(self.username.buf.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(username_style)
                    .title("Username"),
            ),
            parts[1],
        );
        frame.render_widget(
            Paragraph::new(self.password.masked()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(password_style)
                    .title("Password"),
            ),
            parts[2],
        );

        let (row, input) = if self.focus_password {
            (parts[2], &self.password)
        } else {
            (parts[1], &self.username)
        };
        frame.set_cursor_position((row.x + 1 + input.cursor as u16, row.y + 1));

        let mut footer = Vec::new();
        if let Some(err) = &self.error {
            footer.push(Line::from(Span::styled(
                err.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
        footer.push(Line::from(Span::styled(
            if self.busy {
                "logging in..."
            } else {
                "Enter: log in   Tab: switch field   Esc: quit"
            },
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: false }), parts[3]);
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/login_tests.rs"]
mod tests;
