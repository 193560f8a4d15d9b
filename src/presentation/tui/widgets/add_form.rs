use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::presentation::tui::event::FormField;

/// State of the add-target popup.
#[derive(Debug, Default)]
pub struct AddForm {
    pub address: String,
    pub probe: String,
    pub focused: FormField,
}

impl AddForm {
    /// Type a character into the focused field.
    pub fn input(&mut self, c: char) {
        match self.focused {
            FormField::Address => self.address.push(c),
            FormField::Probe => self.probe.push(c),
        }
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        match self.focused {
            FormField::Address => {
                self.address.pop();
            }
            FormField::Probe => {
                self.probe.pop();
            }
        }
    }

    /// Both fields filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.probe.trim().is_empty()
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, horizontal, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(vertical);
    horizontal
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if focused { "█" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>8}: "), label_style),
        Span::raw(value),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}

pub fn render_add_form(frame: &mut Frame, form: &AddForm, probe_names: &[&str], area: Rect) {
    let popup = centered_rect(60, 8, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title("Add target")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));

    let hint = format!("probes: {}", probe_names.join(", "));
    let lines = vec![
        Line::default(),
        field_line("Address", &form.address, form.focused == FormField::Address),
        field_line("Probe", &form.probe, form.focused == FormField::Probe),
        Line::default(),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            "Tab:field  Enter:save  Esc:cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
