use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::{App, Input, Tab, UiEvent};
use crate::forms::{
    self, FeatureDraft, Field, FieldError, SubmitError, TfStateDraft, join_tags, parse_tags,
};
use crate::model::RecordId;

pub(super) struct FormField {
    pub(super) label: &'static str,
    pub(super) field: Option<Field>,
    pub(super) input: Input,
}

impl FormField {
    fn new(label: &'static str, field: Option<Field>, value: impl Into<String>) -> Self {
        Self {
            label,
            field,
            input: Input::with(value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum FormTarget {
    TfState { editing: Option<RecordId> },
    Feature,
}

pub(super) struct Form {
    pub(super) target: FormTarget,
    pub(super) fields: Vec<FormField>,
    pub(super) focus: usize,
    pub(super) error: Option<FieldError>,
    pub(super) failure: Option<String>,
    pub(super) saving: bool,
}

impl Form {
    fn value(&self, i: usize) -> String {
        self.fields
            .get(i)
            .map(|f| f.input.buf.trim().to_string())
            .unwrap_or_default()
    }

    pub(super) fn tfstate_draft(&self) -> TfStateDraft {
        TfStateDraft {
            account: self.value(0),
            bucket: self.value(1),
            path: self.value(2),
            tags: parse_tags(&self.value(3)),
        }
    }

    pub(super) fn feature_draft(&self) -> FeatureDraft {
        FeatureDraft {
            name: self.value(0),
            source: self.value(1),
            tags: parse_tags(&self.value(2)),
            disabled: false,
        }
    }

    /// Shows `err` next to its field and moves focus there.
    pub(super) fn set_field_error(&mut self, err: FieldError) {
        if let Some(i) = self.fields.iter().position(|f| f.field == Some(err.field)) {
            self.focus = i;
        }
        self.error = Some(err);
        self.saving = false;
    }

    fn clear_errors(&mut self) {
        self.error = None;
        self.failure = None;
    }
}

pub(super) enum ModalKind {
    Viewer,
    ConfirmDelete { tab: Tab, id: RecordId },
    Form(Form),
}

pub(super) struct Modal {
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) scroll: usize,
    pub(super) kind: ModalKind,
}

impl Modal {
    pub(super) fn viewer(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::Viewer,
        }
    }

    pub(super) fn confirm_delete(tab: Tab, id: RecordId, what: String) -> Self {
        Self {
            title: "Delete".to_string(),
            lines: vec![
                format!("Delete {}?", what),
                String::new(),
                "y: delete   n/Esc: cancel".to_string(),
            ],
            scroll: 0,
            kind: ModalKind::ConfirmDelete { tab, id },
        }
    }

    pub(super) fn tfstate_form(editing: Option<RecordId>, draft: TfStateDraft) -> Self {
        let title = if editing.is_some() {
            "Edit TF state"
        } else {
            "Add TF state"
        };
        Self {
            title: title.to_string(),
            lines: Vec::new(),
            scroll: 0,
            kind: ModalKind::Form(Form {
                target: FormTarget::TfState { editing },
                fields: vec![
                    FormField::new("Account", Some(Field::Account), draft.account),
                    FormField::new("Bucket", Some(Field::Bucket), draft.bucket),
                    FormField::new("Path", Some(Field::Path), draft.path),
                    FormField::new("Tags", None, join_tags(&draft.tags)),
                ],
                focus: 0,
                error: None,
                failure: None,
                saving: false,
            }),
        }
    }

    pub(super) fn feature_form(draft: FeatureDraft) -> Self {
        Self {
            title: "Add feature".to_string(),
            lines: Vec::new(),
            scroll: 0,
            kind: ModalKind::Form(Form {
                target: FormTarget::Feature,
                fields: vec![
                    FormField::new("Name", Some(Field::Name), draft.name),
                    FormField::new("Source", Some(Field::Source), draft.source),
                    FormField::new("Tags", None, join_tags(&draft.tags)),
                ],
                focus: 0,
                error: None,
                failure: None,
                saving: false,
            }),
        }
    }

    pub(super) fn form_mut(&mut self) -> Option<&mut Form> {
        match &mut self.kind {
            ModalKind::Form(form) => Some(form),
            _ => None,
        }
    }
}

fn centered(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let w = area.width.saturating_sub(6).clamp(20, max_w);
    let h = area.height.saturating_sub(6).clamp(8, max_h);
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

pub(super) fn draw_modal(frame: &mut ratatui::Frame, modal: &Modal) {
    let box_area = centered(frame.area(), 90, 22);
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal.title.as_str());
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    match &modal.kind {
        ModalKind::Viewer | ModalKind::ConfirmDelete { .. } => {
            let lines: Vec<Line> = modal.lines.iter().map(|s| Line::from(s.as_str())).collect();
            let scroll = modal.scroll.min(modal.lines.len().saturating_sub(1)) as u16;
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0)),
                inner,
            );
        }
        ModalKind::Form(form) => draw_form(frame, form, inner),
    }
}

fn draw_form(frame: &mut ratatui::Frame, form: &Form, area: Rect) {
    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, f) in form.fields.iter().enumerate() {
        let has_error = form
            .error
            .as_ref()
            .is_some_and(|e| f.field == Some(e.field));
        let border = if has_error {
            Style::default().fg(Color::Red)
        } else if i == form.focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(f.input.buf.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(f.label),
            ),
            parts[i],
        );
        if i == form.focus {
            frame.set_cursor_position((parts[i].x + 1 + f.input.cursor as u16, parts[i].y + 1));
        }
    }

    let mut footer = Vec::new();
    if let Some(err) = &form.error {
        footer.push(Line::from(Span::styled(
            err.message.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(msg) = &form.failure {
        footer.push(Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    footer.push(Line::from(Span::styled(
        if form.saving {
            "saving..."
        } else {
            "Enter: save   Tab: next field   Esc: cancel"
        },
        Style::default().fg(Color::Gray),
    )));
    if let Some(area) = parts.last() {
        frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: false }), *area);
    }
}

pub(super) fn handle_modal_key(app: &mut App, key: KeyEvent) {
    enum ModalAction {
        None,
        Close,
        Delete { tab: Tab, id: RecordId },
        Submit,
    }

    let action = {
        let Some(m) = app.modal.as_mut() else {
            return;
        };

        match &mut m.kind {
            ModalKind::Viewer => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up => {
                    m.scroll = m.scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down => {
                    if m.scroll < m.lines.len().saturating_sub(1) {
                        m.scroll += 1;
                    }
                    ModalAction::None
                }
                KeyCode::PageUp => {
                    m.scroll = m.scroll.saturating_sub(10);
                    ModalAction::None
                }
                KeyCode::PageDown => {
                    m.scroll = (m.scroll + 10).min(m.lines.len().saturating_sub(1));
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
            ModalKind::ConfirmDelete { tab, id } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => ModalAction::Delete {
                    tab: *tab,
                    id: id.clone(),
                },
                KeyCode::Char('n') | KeyCode::Esc => ModalAction::Close,
                _ => ModalAction::None,
            },
            ModalKind::Form(form) => {
                if form.saving {
                    // Only cancel while a submit is outstanding.
                    if key.code == KeyCode::Esc {
                        ModalAction::Close
                    } else {
                        ModalAction::None
                    }
                } else {
                    let n = form.fields.len();
                    match key.code {
                        KeyCode::Esc => ModalAction::Close,
                        KeyCode::Enter => ModalAction::Submit,
                        KeyCode::Tab | KeyCode::Down => {
                            form.focus = (form.focus + 1) % n;
                            ModalAction::None
                        }
                        KeyCode::BackTab | KeyCode::Up => {
                            form.focus = (form.focus + n - 1) % n;
                            ModalAction::None
                        }
                        code => {
                            if let Some(f) = form.fields.get_mut(form.focus) {
                                match code {
                                    KeyCode::Char(c) => f.input.insert_char(c),
                                    KeyCode::Backspace => f.input.backspace(),
                                    KeyCode::Delete => f.input.delete(),
                                    KeyCode::Left => f.input.move_left(),
                                    KeyCode::Right => f.input.move_right(),
                                    _ => {}
                                }
                            }
                            form.clear_errors();
                            ModalAction::None
                        }
                    }
                }
            }
        }
    };

    match action {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        ModalAction::Delete { tab, id } => {
            app.modal = None;
            app.delete_record(tab, &id);
        }
        ModalAction::Submit => submit_form(app),
    }
}

fn submit_form(app: &mut App) {
    let ctx = app.action_ctx();
    let Some(form) = app.modal.as_mut().and_then(Modal::form_mut) else {
        return;
    };

    match form.target.clone() {
        FormTarget::TfState { editing } => {
            let draft = form.tfstate_draft();
            if let Err(err) = draft.validate() {
                form.set_field_error(err);
                return;
            }
            form.saving = true;
            tokio::spawn(async move {
                let res = forms::submit_tfstate(&ctx.client, &draft, editing.as_ref()).await;
                ctx.events.send(form_finished(Tab::TfStates, res.map(|_| ())));
            });
        }
        FormTarget::Feature => {
            let draft = form.feature_draft();
            if let Err(err) = draft.validate() {
                form.set_field_error(err);
                return;
            }
            form.saving = true;
            tokio::spawn(async move {
                let res = forms::submit_feature(&ctx.client, &draft, None).await;
                ctx.events.send(form_finished(Tab::Features, res.map(|_| ())));
            });
        }
    }
}

fn form_finished(tab: Tab, res: Result<(), SubmitError>) -> UiEvent {
    match res {
        Ok(()) => UiEvent::FormSaved(tab),
        Err(SubmitError::Field(err)) => UiEvent::FormRejected(err),
        Err(SubmitError::Gateway(err)) => UiEvent::FormFailed(err.to_string()),
    }
}
