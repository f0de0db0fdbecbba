//! Filter form state.
//!
//! Holds the three text inputs and normalizes them into [`FilterCriteria`]
//! on submit.

use crate::api::models::DEFAULT_MIN_RATING;
use crate::api::{ApiError, FilterCriteria, Movie};
use crate::components::{FetchStatus, RequestSeq};
use tracing::{debug, error};

/// Input fields of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    MinRating,
    Genre,
    Year,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [FormField; 3] = [FormField::MinRating, FormField::Genre, FormField::Year];

    /// Label shown above the input.
    pub fn label(self) -> &'static str {
        match self {
            FormField::MinRating => "Minimum Rating",
            FormField::Genre => "Genre",
            FormField::Year => "Year",
        }
    }

    /// Placeholder shown while the input is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::MinRating => "Enter minimum rating",
            FormField::Genre => "Enter genre",
            FormField::Year => "Enter year",
        }
    }

    /// Numeric inputs only accept characters that can form a number.
    pub fn is_numeric(self) -> bool {
        !matches!(self, FormField::Genre)
    }

    fn next(self) -> Self {
        match self {
            FormField::MinRating => FormField::Genre,
            FormField::Genre => FormField::Year,
            FormField::Year => FormField::MinRating,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::MinRating => FormField::Year,
            FormField::Genre => FormField::MinRating,
            FormField::Year => FormField::Genre,
        }
    }
}

/// A submitted filter, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSubmission {
    pub seq: u64,
    pub criteria: FilterCriteria,
}

/// Filter form state.
#[derive(Debug, Clone)]
pub struct FilterForm {
    /// Raw minimum rating input
    pub min_rating: String,
    /// Raw genre input
    pub genre: String,
    /// Raw year input
    pub year: String,
    /// Field receiving keystrokes
    pub focused: FormField,
    requests: RequestSeq,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterForm {
    /// Create a form with the default minimum rating and empty genre/year.
    pub fn new() -> Self {
        Self {
            min_rating: format_rating(DEFAULT_MIN_RATING),
            genre: String::new(),
            year: String::new(),
            focused: FormField::MinRating,
            requests: RequestSeq::default(),
        }
    }

    /// Current text of a field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::MinRating => &self.min_rating,
            FormField::Genre => &self.genre,
            FormField::Year => &self.year,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::MinRating => &mut self.min_rating,
            FormField::Genre => &mut self.genre,
            FormField::Year => &mut self.year,
        }
    }

    /// Type a character into the focused field.
    ///
    /// # Details
    /// Numeric fields drop anything but digits, `.` and `-`.
    pub fn insert_char(&mut self, ch: char) {
        let field = self.focused;
        if field.is_numeric() && !(ch.is_ascii_digit() || ch == '.' || ch == '-') {
            return;
        }
        self.value_mut(field).push(ch);
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        let field = self.focused;
        self.value_mut(field).pop();
    }

    /// Move focus to the next field, wrapping.
    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    /// Move focus to the previous field, wrapping.
    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    /// Normalize the inputs into filter criteria.
    ///
    /// # Details
    /// - `year`: leading integer of the input, `None` when empty or not numeric
    /// - `genre`: `None` when empty, otherwise the literal text
    /// - `min_rating`: parsed number; empty or unparsable falls back to the default
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_rating: parse_min_rating(&self.min_rating),
            genre: (!self.genre.is_empty()).then(|| self.genre.clone()),
            year: parse_year(&self.year),
        }
    }

    /// Submit the form, issuing a new request.
    pub fn submit(&mut self) -> FilterSubmission {
        let criteria = self.criteria();
        let seq = self.requests.issue();
        debug!(seq, ?criteria, "Submitting filter");
        FilterSubmission { seq, criteria }
    }

    /// Apply the response to a submission.
    ///
    /// # Returns
    /// * `(FetchStatus, Option<Vec<Movie>>)` - Outcome, plus the movies to hand
    ///   to the parent when the response is current and successful
    pub fn on_response(
        &self,
        seq: u64,
        result: Result<Vec<Movie>, ApiError>,
    ) -> (FetchStatus, Option<Vec<Movie>>) {
        let stale = !self.requests.is_current(seq);
        if let Err(e) = &result {
            error!(error = %e, timeout = e.is_timeout(), seq, stale, "Error fetching filtered movies");
        }
        if stale {
            debug!(seq, "Dropping stale filter response");
            return (FetchStatus::Stale, None);
        }
        match result {
            Ok(movies) => (FetchStatus::Applied(movies.len()), Some(movies)),
            Err(e) => (FetchStatus::Failed(e.to_string()), None),
        }
    }
}

/// Parse the minimum rating input.
fn parse_min_rating(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => DEFAULT_MIN_RATING,
    }
}

/// Parse the leading integer of the year input (`"2010.5"` → 2010).
fn parse_year(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_start + digits_len].parse().ok()
}

fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{}", rating as i64)
    } else {
        rating.to_string()
    }
}
