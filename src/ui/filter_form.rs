//! Filter form widget rendering.
//!
//! Displays the three filter inputs side by side.

use crate::app::{App, Focus};
use crate::components::FormField;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

fn form_block(app: &App) -> Block<'static> {
    let is_active = app.focus == Focus::Filters;
    let title = if is_active {
        format!(
            "Filter Movies ({} results) - Enter to apply, Esc to leave",
            app.filtered_movies.len()
        )
    } else {
        format!("Filter Movies ({} results) - press Tab", app.filtered_movies.len())
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

/// Regions of the three inputs, in [`FormField::ALL`] order.
fn field_areas(app: &App, area: Rect) -> Vec<Rect> {
    let inner = form_block(app).inner(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(inner)
        .to_vec()
}

/// Input under a screen position, if any.
pub fn field_at(app: &App, area: Rect, column: u16, row: u16) -> Option<FormField> {
    field_areas(app, area)
        .into_iter()
        .zip(FormField::ALL)
        .find(|(rect, _)| rect.contains(Position::new(column, row)))
        .map(|(_, field)| field)
}

/// Render the filter form widget.
///
/// # Details
/// Each input shows its label and current value; the focused input gets a
/// cursor. Empty inputs show their placeholder.
pub fn render_filter_form(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.focus == Focus::Filters;
    let areas = field_areas(app, area);
    Widget::render(form_block(app), area, buf);

    for (field, field_area) in FormField::ALL.into_iter().zip(areas) {
        let is_focused = is_active && app.form.focused == field;
        let value = app.form.value(field);

        let label_style = if is_focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let value_span = if value.is_empty() && !is_focused {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::White))
        };

        let lines = vec![
            Line::from(Span::styled(field.label(), label_style)),
            Line::from(vec![
                Span::styled("> ", label_style),
                value_span,
                Span::styled(
                    if is_focused { "_" } else { "" },
                    Style::default().fg(Color::Yellow),
                ),
            ]),
        ];

        Widget::render(Paragraph::new(lines), field_area, buf);
    }
}
