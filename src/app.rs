//! Application state management.
//!
//! Composes the filter form, recommendations and analytics panels, routes
//! keys to the focused panel and turns panel actions into fetch commands.

use crate::api::{ApiError, FilterCriteria, Movie};
use crate::components::filter_form::FilterSubmission;
use crate::components::{
    Analytics, FetchStatus, FilterForm, FormField, PageAction, PageRequest, Recommendations,
};
use crate::config::Config;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;

/// Panel receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Filter form inputs
    Filters,
    /// Recommendations list and pagination
    Recommendations,
}

/// A request the event loop should send.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// POST `/analytics` on behalf of the filter form
    FilterMovies(FilterSubmission),
    /// POST `/recommend` for one page
    Recommend(PageRequest),
    /// POST `/analytics` for the chart
    Analytics(FilterCriteria),
}

/// A finished request, sent back to the event loop.
#[derive(Debug)]
pub enum FetchEvent {
    Filtered {
        seq: u64,
        result: Result<Vec<Movie>, ApiError>,
    },
    Recommended {
        seq: u64,
        page: u32,
        result: Result<Vec<Movie>, ApiError>,
    },
    Analytics {
        result: Result<Value, ApiError>,
    },
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Filter form panel
    pub form: FilterForm,
    /// Recommendations panel
    pub recommendations: Recommendations,
    /// Analytics chart panel
    pub analytics: Analytics,
    /// Movies returned by the last filter submission
    ///
    /// The recommendations panel keeps its own fixed query and does not read
    /// this list.
    pub filtered_movies: Vec<Movie>,
    /// Focused panel
    pub focus: Focus,
    /// Status message to display
    pub status_message: Option<String>,
    /// Set when the user asked to quit
    pub should_quit: bool,
}

impl App {
    /// Create a new application state.
    pub fn new(config: &Config) -> Self {
        Self {
            form: FilterForm::new(),
            recommendations: Recommendations::new(config),
            analytics: Analytics::new(config),
            filtered_movies: Vec::new(),
            focus: Focus::Recommendations,
            status_message: None,
            should_quit: false,
        }
    }

    /// Requests issued when the interface first shows.
    pub fn mount(&mut self) -> Vec<Command> {
        let mut commands = vec![Command::Recommend(self.recommendations.mount())];
        if let Some(query) = self.analytics.mount() {
            commands.push(Command::Analytics(query));
        }
        commands
    }

    /// Handle a key press.
    ///
    /// # Returns
    /// * `Option<Command>` - Request triggered by the key, if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Filters => self.handle_form_key(key.code),
            Focus::Recommendations => self.handle_list_key(key.code),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Enter => return Some(self.submit_filters()),
            KeyCode::Esc => self.focus = Focus::Recommendations,
            KeyCode::Up => self.form.focus_prev(),
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.insert_char(c),
            _ => {}
        }
        None
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Option<Command> {
        let action = match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.focus = Focus::Filters;
                return None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.recommendations.move_up();
                return None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.recommendations.move_down();
                return None;
            }
            KeyCode::Left | KeyCode::Char('h') => PageAction::Prev,
            KeyCode::Right | KeyCode::Char('l') => PageAction::Next,
            KeyCode::Home | KeyCode::Char('g') => PageAction::First,
            KeyCode::End | KeyCode::Char('G') => PageAction::Last,
            KeyCode::Char('0') => PageAction::Page(10),
            KeyCode::Char(c @ '1'..='9') => PageAction::Page(c.to_digit(10)?),
            _ => return None,
        };
        self.change_page(action)
    }

    /// Apply a pagination control.
    pub fn change_page(&mut self, action: PageAction) -> Option<Command> {
        self.recommendations.apply(action).map(Command::Recommend)
    }

    /// Submit the filter form.
    pub fn submit_filters(&mut self) -> Command {
        let submission = self.form.submit();
        self.set_status("Applying filters...".to_string());
        Command::FilterMovies(submission)
    }

    /// Focus a form field, e.g. after a mouse click.
    pub fn focus_field(&mut self, field: FormField) {
        self.focus = Focus::Filters;
        self.form.focused = field;
    }

    /// Switch focus between the form and the recommendations list.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Filters => Focus::Recommendations,
            Focus::Recommendations => Focus::Filters,
        };
    }

    /// Apply a finished request to the panel that issued it.
    pub fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Filtered { seq, result } => {
                let (status, movies) = self.form.on_response(seq, result);
                if let Some(movies) = movies {
                    self.filtered_movies = movies;
                }
                self.report("Filter", status, |count| {
                    format!("Filter returned {} movies", count)
                });
            }
            FetchEvent::Recommended { seq, page, result } => {
                let status = self.recommendations.on_response(seq, result);
                self.report("Recommendations", status, |count| {
                    format!("Loaded page {} ({} movies)", page, count)
                });
            }
            FetchEvent::Analytics { result } => {
                let status = self.analytics.on_response(result);
                self.report("Analytics", status, |count| {
                    format!("Charted {} ratings", count)
                });
            }
        }
    }

    fn report(&mut self, source: &str, status: FetchStatus, applied: impl FnOnce(usize) -> String) {
        let message = match status {
            FetchStatus::Applied(count) => applied(count),
            FetchStatus::Failed(reason) => format!("{} failed: {}", source, reason),
            FetchStatus::Stale => return,
        };
        self.set_status(format!("[{}] {}", Local::now().format("%H:%M:%S"), message));
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}
