//! UI components module.
//!
//! Contains ratatui widgets for displaying the application interface and
//! the layout shared by rendering and mouse hit-testing.

pub mod analytics;
pub mod filter_form;
pub mod recommendations;

pub use analytics::render_analytics;
pub use filter_form::{field_at, render_filter_form};
pub use recommendations::{page_action_at, render_pagination, render_recommendations};

use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

const HELP_TEXT: &str =
    "q quit | Tab switch panel | ←/→ page | 1-9,0 jump | Enter apply filters";

/// Screen regions of each panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Areas {
    pub form: Rect,
    pub list: Rect,
    pub pagination: Rect,
    pub chart: Rect,
    pub status: Rect,
}

/// Split the screen into panels.
pub fn layout(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Filter form
            Constraint::Min(0),    // Recommendations + chart
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(columns[0]);

    Areas {
        form: rows[0],
        list: left[0],
        pagination: left[1],
        chart: columns[1],
        status: rows[2],
    }
}

/// Render the complete UI.
///
/// # Returns
/// * `Areas` - Regions used, for mouse hit-testing
pub fn render(app: &App, area: Rect, buf: &mut Buffer) -> Areas {
    let areas = layout(area);

    render_filter_form(app, areas.form, buf);
    render_recommendations(app, areas.list, buf);
    render_pagination(app, areas.pagination, buf);
    render_analytics(app, areas.chart, buf);

    let status_text = app.status_message.as_deref().unwrap_or(HELP_TEXT);
    let status = Paragraph::new(Line::from(status_text))
        .block(Block::default().borders(Borders::ALL));
    Widget::render(status, areas.status, buf);

    areas
}

/// Flatten a buffer into text, one row per line.
#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
