use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::domain::entities::target::Target;

fn status_style(target: &Target) -> Style {
    match &target.last_status {
        Some(status) if status.success => Style::default().fg(Color::Green),
        Some(_) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    }
}

fn status_cell(target: &Target) -> (String, String) {
    match &target.last_status {
        Some(status) => {
            let state = if status.success { "UP" } else { "DOWN" };
            // Multi-line probe messages (Minecraft MOTDs) collapse to one row.
            let message = status.message.replace('\n', " | ");
            (state.to_string(), message)
        }
        None => ("?".to_string(), "not checked yet".to_string()),
    }
}

pub fn render_target_grid(
    frame: &mut Frame,
    targets: &[Target],
    table_state: &mut TableState,
    is_focused: bool,
    area: Rect,
) {
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title("Targets")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    if targets.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No targets yet. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Address", "Probe", "Status", "Last result", "Checked"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row<'_>> = targets
        .iter()
        .map(|target| {
            let style = status_style(target);
            let (state, message) = status_cell(target);
            let checked = target.last_status.as_ref().map_or_else(
                || "--:--:--".to_string(),
                |s| s.timestamp.format("%H:%M:%S").to_string(),
            );
            Row::new(vec![
                Cell::from(target.address.clone()),
                Cell::from(target.probe.clone()),
                Cell::from(Span::styled(state, style.add_modifier(Modifier::BOLD))),
                Cell::from(Span::styled(message, style)),
                Cell::from(checked),
            ])
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Fill(1),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(highlight_style)
    .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, table_state);
}
