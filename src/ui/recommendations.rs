//! Recommendations list and pagination bar rendering.
//!
//! Displays one page of movie cards with selection highlighting, and the
//! First / Prev / numbered / Next / Last controls below it.

use crate::app::{App, Focus};
use crate::components::{PageAction, Pagination};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

/// Lines per card: title, release year, separator.
const LINES_PER_CARD: u16 = 3;

/// Render the recommendations list widget.
///
/// # Details
/// Each movie is a card of three lines:
/// - Line 1: Movie title (bold)
/// - Line 2: Release year
/// - Line 3: Separator
///
/// The selected card is kept centered while scrolling.
pub fn render_recommendations(app: &App, area: Rect, buf: &mut Buffer) {
    let panel = &app.recommendations;
    let is_active = app.focus == Focus::Recommendations;
    let mut title = format!(
        "Movie Recommendations (page {}/{})",
        panel.pagination.current_page, panel.pagination.total_pages
    );
    if let Some(loaded_at) = panel.loaded_at {
        title.push_str(&format!(" - {}", loaded_at.format("%H:%M:%S")));
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    if panel.movies.is_empty() {
        let list = List::new(vec![ListItem::new("No recommendations to display")]).block(block);
        Widget::render(list, area, buf);
        return;
    }

    let selected_index = panel.selected_index.min(panel.movies.len() - 1);

    let separator_width = area.width.saturating_sub(2).max(10) as usize;
    let separator_line = "─".repeat(separator_width);

    // Keep the selection centered
    let available_height = area.height.saturating_sub(2);
    let visible_cards = (available_height / LINES_PER_CARD).max(1) as usize;
    let center_offset = visible_cards / 2;
    let max_scroll = panel.movies.len().saturating_sub(visible_cards);
    let scroll_offset = selected_index.saturating_sub(center_offset).min(max_scroll);

    let items: Vec<ListItem> = panel
        .movies
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_cards)
        .map(|(idx, movie)| {
            let is_selected = idx == selected_index;

            let title_style = Style::default()
                .fg(if is_selected { Color::Yellow } else { Color::White })
                .add_modifier(Modifier::BOLD);
            let separator_style = if is_selected {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(vec![
                Line::from(Span::styled(movie.title(), title_style)),
                Line::from(Span::styled(
                    format!("Release Year: {}", movie.format_release_year()),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(separator_line.clone(), separator_style)),
            ])
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index - scroll_offset));

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    );

    StatefulWidget::render(list, area, buf, &mut list_state);
}

/// Pagination buttons in display order, with their labels.
fn page_buttons(pagination: &Pagination) -> Vec<(String, PageAction)> {
    let mut buttons = vec![
        ("«".to_string(), PageAction::First),
        ("‹".to_string(), PageAction::Prev),
    ];
    buttons.extend((1..=pagination.total_pages).map(|page| (page.to_string(), PageAction::Page(page))));
    buttons.push(("›".to_string(), PageAction::Next));
    buttons.push(("»".to_string(), PageAction::Last));
    buttons
}

/// Drawn width of a button: its label padded by one space on each side.
fn button_width(label: &str) -> u16 {
    label.chars().count() as u16 + 2
}

/// Pagination control under a screen position, if any.
pub fn page_action_at(pagination: &Pagination, area: Rect, column: u16, row: u16) -> Option<PageAction> {
    // Buttons sit on the single inner row of the bordered bar
    if row != area.y + 1 || column <= area.x || column >= area.right().saturating_sub(1) {
        return None;
    }
    let mut x = area.x + 1;
    for (label, action) in page_buttons(pagination) {
        let width = button_width(&label);
        if column < x + width {
            return Some(action);
        }
        x += width;
    }
    None
}

/// Render the pagination bar.
///
/// # Details
/// The current page is highlighted.
pub fn render_pagination(app: &App, area: Rect, buf: &mut Buffer) {
    let pagination = &app.recommendations.pagination;
    let spans: Vec<Span> = page_buttons(pagination)
        .into_iter()
        .map(|(label, action)| {
            let style = match action {
                PageAction::Page(page) if page == pagination.current_page => Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                PageAction::Page(_) => Style::default().fg(Color::White),
                _ => Style::default().fg(Color::Cyan),
            };
            Span::styled(format!(" {} ", label), style)
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Pages").borders(Borders::ALL));

    Widget::render(paragraph, area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Movie;
    use crate::app::FetchEvent;
    use crate::config::Config;
    use crate::ui::buffer_text;

    fn loaded_app(movies: Vec<Movie>) -> App {
        let mut app = App::new(&Config::default());
        let commands = app.mount();
        let crate::app::Command::Recommend(request) = &commands[0] else {
            panic!("expected a recommend command");
        };
        app.apply(FetchEvent::Recommended {
            seq: request.seq,
            page: 1,
            result: Ok(movies),
        });
        app
    }

    #[test]
    fn test_render_cards() {
        let app = loaded_app(vec![Movie::new("Heat", 1995), Movie::new("Ronin", 1998)]);
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        render_recommendations(&app, area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Movie Recommendations (page 1/10)"));
        assert!(text.contains("Heat"));
        assert!(text.contains("Release Year: 1998"));
    }

    #[test]
    fn test_render_empty_list() {
        let app = App::new(&Config::default());
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        render_recommendations(&app, area, &mut buf);
        assert!(buffer_text(&buf).contains("No recommendations to display"));
    }

    #[test]
    fn test_page_action_hit_testing() {
        let pagination = Pagination {
            current_page: 1,
            total_pages: 10,
            page_size: 10,
        };
        let area = Rect::new(0, 20, 80, 3);
        // " « " occupies x 1..4, " ‹ " 4..7, " 1 " 7..10, " 2 " 10..13
        assert_eq!(page_action_at(&pagination, area, 2, 21), Some(PageAction::First));
        assert_eq!(page_action_at(&pagination, area, 5, 21), Some(PageAction::Prev));
        assert_eq!(page_action_at(&pagination, area, 8, 21), Some(PageAction::Page(1)));
        assert_eq!(page_action_at(&pagination, area, 12, 21), Some(PageAction::Page(2)));
        // Pages 1-9 take 3 columns each, " 10 " takes 4: x 34..38
        assert_eq!(page_action_at(&pagination, area, 35, 21), Some(PageAction::Page(10)));
        assert_eq!(page_action_at(&pagination, area, 39, 21), Some(PageAction::Next));
        assert_eq!(page_action_at(&pagination, area, 42, 21), Some(PageAction::Last));
        assert_eq!(page_action_at(&pagination, area, 50, 21), None);
        assert_eq!(page_action_at(&pagination, area, 8, 20), None);
    }

    #[test]
    fn test_render_pagination_bar() {
        let app = loaded_app(Vec::new());
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        render_pagination(&app, area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains(" «  ‹  1  2  3 "));
        assert!(text.contains(" 10  ›  » "));
    }
}
