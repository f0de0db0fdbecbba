//! Analytics chart rendering.
//!
//! Draws the rating series as a line chart over movie index.

use crate::app::App;
use crate::components::ChartSeries;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

/// Longest title shown on the x axis.
const MAX_AXIS_LABEL: usize = 16;

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_AXIS_LABEL {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(MAX_AXIS_LABEL - 1).collect();
        short.push('…');
        short
    }
}

/// Columns taken by the y axis labels and the chart borders.
const Y_AXIS_WIDTH: u16 = 8;

/// X axis labels: evenly spaced titles, as many as fit in `width`.
///
/// # Details
/// The first and last titles are always shown. Ratatui spreads labels evenly
/// over the axis, so label `j` of `k` names the movie at index
/// `j * (n - 1) / (k - 1)`.
fn x_labels(series: &ChartSeries, width: u16) -> Vec<String> {
    let n = series.labels.len();
    if n <= 1 {
        return series.labels.iter().map(|label| shorten(label)).collect();
    }
    let slots = usize::from(width.saturating_sub(Y_AXIS_WIDTH)) / (MAX_AXIS_LABEL + 2);
    let k = slots.clamp(2, n);
    (0..k)
        .map(|j| shorten(&series.labels[j * (n - 1) / (k - 1)]))
        .collect()
}

/// Render the analytics chart widget.
///
/// # Details
/// Until a usable response arrives the chart is drawn with an empty series.
pub fn render_analytics(app: &App, area: Rect, buf: &mut Buffer) {
    let series = &app.analytics.series;
    let points = series.points();
    let x_max = series.labels.len().saturating_sub(1).max(1) as f64;
    let y_max = series.y_max();

    let mut title = "Movie Analytics".to_string();
    if series.is_empty() {
        title.push_str(" (no data)");
    } else if let Some(loaded_at) = app.analytics.loaded_at {
        title.push_str(&format!(" - {} movies, {}", series.labels.len(), loaded_at.format("%H:%M:%S")));
    }

    let dataset = Dataset::default()
        .name(ChartSeries::NAME)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Movie")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels(series, area.width)),
        )
        .y_axis(
            Axis::default()
                .title("Rating")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    format!("{}", y_max / 2.0),
                    format!("{}", y_max),
                ])
                .labels_alignment(Alignment::Right),
        );

    Widget::render(chart, area, buf);
}
