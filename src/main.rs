//! Movie recommendation TUI - terminal client for a movie recommendation service.
//!
//! Main entry point and event loop for the application.

mod api;
mod app;
mod components;
mod config;
mod logging;
mod ui;

use api::MovieClient;
use app::{App, Command, FetchEvent, Focus};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

/// Main application entry point.
///
/// # Details
/// Loads configuration, sets up logging, issues the initial requests and
/// runs the event loop until the user quits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(None)?;
    logging::init(&config.log_file_path()?)?;
    info!(base_url = %config.base_url, "Starting movie-rec-tui");

    // Write a default config on first run so there is something to edit
    let config_path = Config::default_config_path()?;
    if !config_path.exists() {
        match config.save(Some(&config_path)) {
            Ok(()) => info!(path = %config_path.display(), "Wrote default config"),
            Err(e) => warn!(error = %e, "Failed to write default config"),
        }
    }

    let client = MovieClient::new(&config)?;
    let mut app = App::new(&config);
    let (tx, mut rx) = unbounded_channel();

    for command in app.mount() {
        spawn_command(&client, &tx, command);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &client, &tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting");
    result
}

/// Send a request in the background.
///
/// # Details
/// The result is posted to `tx` and applied by the event loop. Requests are
/// never cancelled; stale answers are filtered out when applied.
fn spawn_command(client: &MovieClient, tx: &UnboundedSender<FetchEvent>, command: Command) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match command {
            Command::FilterMovies(submission) => FetchEvent::Filtered {
                seq: submission.seq,
                result: client.filter_movies(&submission.criteria).await,
            },
            Command::Recommend(request) => FetchEvent::Recommended {
                seq: request.seq,
                page: request.body.page,
                result: client.recommend(&request.body).await,
            },
            Command::Analytics(criteria) => FetchEvent::Analytics {
                result: client.analytics(&criteria).await,
            },
        };
        // Receiver is gone only after the UI has shut down
        if tx.send(event).is_err() {
            debug!("Dropping response received after shutdown");
        }
    });
}

/// Main event loop.
///
/// # Details
/// Renders, applies finished requests, then handles keyboard and mouse
/// events. Polls with a timeout so responses show up without input.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &MovieClient,
    tx: &UnboundedSender<FetchEvent>,
    rx: &mut UnboundedReceiver<FetchEvent>,
) -> anyhow::Result<()> {
    let mut areas = ui::Areas::default();

    loop {
        terminal.draw(|f| {
            let area = f.area();
            areas = ui::render(app, area, f.buffer_mut());
        })?;

        while let Ok(fetch) = rx.try_recv() {
            app.apply(fetch);
        }

        if event::poll(Duration::from_millis(100))? {
            let command = match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, &areas),
                _ => None,
            };
            if let Some(command) = command {
                spawn_command(client, tx, command);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle mouse events (scroll and click).
///
/// # Details
/// Scrolling moves the recommendation selection, clicking a pagination
/// button changes page, clicking an input focuses it.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App, areas: &ui::Areas) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.recommendations.move_up();
            None
        }
        MouseEventKind::ScrollDown => {
            app.recommendations.move_down();
            None
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(action) = ui::page_action_at(
                &app.recommendations.pagination,
                areas.pagination,
                mouse.column,
                mouse.row,
            ) {
                app.focus = Focus::Recommendations;
                return app.change_page(action);
            }
            if let Some(field) = ui::field_at(app, areas.form, mouse.column, mouse.row) {
                app.focus_field(field);
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{FormField, PageAction};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(&Config::default());
        let Some(Command::Recommend(request)) = app.mount().into_iter().next() else {
            panic!("expected a recommend command");
        };
        app.apply(FetchEvent::Recommended {
            seq: request.seq,
            page: 1,
            result: Ok(Vec::new()),
        });
        app
    }

    #[test]
    fn test_click_page_button_requests_page() {
        let mut app = loaded_app();
        let areas = ui::layout(Rect::new(0, 0, 120, 40));
        // Third page button: " « " " ‹ " " 1 " " 2 " " 3 "
        let column = areas.pagination.x + 1 + 3 * 4 + 1;
        let row = areas.pagination.y + 1;

        match handle_mouse_event(click(column, row), &mut app, &areas) {
            Some(Command::Recommend(request)) => assert_eq!(request.body.page, 3),
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(app.recommendations.pagination.current_page, 3);
        assert_eq!(
            app.recommendations.pagination.target(PageAction::Next),
            Some(4)
        );
    }

    #[test]
    fn test_click_form_field_focuses_it() {
        let mut app = loaded_app();
        let areas = ui::layout(Rect::new(0, 0, 120, 40));
        let column = areas.form.x + areas.form.width - 3;

        assert!(handle_mouse_event(click(column, areas.form.y + 2), &mut app, &areas).is_none());
        assert_eq!(app.focus, Focus::Filters);
        assert_eq!(app.form.focused, FormField::Year);
    }
}
