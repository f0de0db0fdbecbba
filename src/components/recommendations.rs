//! Recommendations panel state.
//!
//! Fetches one page of recommendations at a time with a fixed query and
//! keeps the pagination controls in sync.

use crate::api::{ApiError, FilterCriteria, Movie, RecommendRequest};
use crate::components::{FetchStatus, RequestSeq};
use crate::config::Config;
use chrono::{DateTime, Local};
use std::cmp;
use tracing::{debug, error};

/// A pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    First,
    Prev,
    /// Jump to a 1-indexed page
    Page(u32),
    Next,
    Last,
}

/// Pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed current page
    pub current_page: u32,
    /// Number of pages, at least 1
    pub total_pages: u32,
    /// Movies per page
    pub page_size: u32,
}

impl Pagination {
    /// Start on page 1 of 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size: page_size.max(1),
        }
    }

    /// Page an action leads to.
    ///
    /// # Returns
    /// * `Option<u32>` - Target page, or None for a page number outside
    ///   `1..=total_pages`
    ///
    /// # Details
    /// Prev and Next clamp to the first and last page.
    pub fn target(&self, action: PageAction) -> Option<u32> {
        match action {
            PageAction::First => Some(1),
            PageAction::Prev => Some(cmp::max(self.current_page.saturating_sub(1), 1)),
            PageAction::Page(page) => (1..=self.total_pages).contains(&page).then_some(page),
            PageAction::Next => Some(cmp::min(self.current_page + 1, self.total_pages)),
            PageAction::Last => Some(self.total_pages),
        }
    }

    /// Derive the page count from a total result count.
    pub fn set_total_results(&mut self, total_results: u32) {
        self.total_pages = total_results.div_ceil(self.page_size).max(1);
    }
}

/// A recommendations request, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub seq: u64,
    pub body: RecommendRequest,
}

/// Recommendations panel state.
#[derive(Debug, Clone)]
pub struct Recommendations {
    /// Movies of the current page, in server order
    pub movies: Vec<Movie>,
    /// Pagination controls
    pub pagination: Pagination,
    /// Highlighted card
    pub selected_index: usize,
    /// When the current page arrived
    pub loaded_at: Option<DateTime<Local>>,
    query: FilterCriteria,
    assumed_total_results: u32,
    requests: RequestSeq,
}

impl Recommendations {
    /// Create the panel from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            movies: Vec::new(),
            pagination: Pagination::new(config.effective_page_size()),
            selected_index: 0,
            loaded_at: None,
            query: config.recommend_query.clone(),
            assumed_total_results: config.assumed_total_results,
            requests: RequestSeq::default(),
        }
    }

    /// Request for the current page, issued when the panel first shows.
    pub fn mount(&mut self) -> PageRequest {
        self.request_page(self.pagination.current_page)
    }

    /// Apply a pagination control.
    ///
    /// # Returns
    /// * `Option<PageRequest>` - Request for the new page, or None when the
    ///   action leaves the page unchanged
    pub fn apply(&mut self, action: PageAction) -> Option<PageRequest> {
        let target = self.pagination.target(action)?;
        if target == self.pagination.current_page {
            return None;
        }
        self.pagination.current_page = target;
        Some(self.request_page(target))
    }

    fn request_page(&mut self, page: u32) -> PageRequest {
        let seq = self.requests.issue();
        debug!(seq, page, "Requesting recommendations");
        PageRequest {
            seq,
            body: RecommendRequest {
                criteria: self.query.clone(),
                page,
                limit: self.pagination.page_size,
            },
        }
    }

    /// Apply the response to a page request.
    ///
    /// # Details
    /// Failures are always logged, even when stale. Stale responses are then
    /// dropped. On failure the previous page stays on screen.
    pub fn on_response(&mut self, seq: u64, result: Result<Vec<Movie>, ApiError>) -> FetchStatus {
        let stale = !self.requests.is_current(seq);
        if let Err(e) = &result {
            error!(error = %e, timeout = e.is_timeout(), seq, stale, "Error fetching recommendations");
        }
        if stale {
            debug!(seq, "Dropping stale recommendations response");
            return FetchStatus::Stale;
        }
        match result {
            Ok(movies) => {
                let count = movies.len();
                self.movies = movies;
                self.selected_index = 0;
                self.loaded_at = Some(Local::now());
                self.pagination.set_total_results(self.assumed_total_results);
                FetchStatus::Applied(count)
            }
            Err(e) => FetchStatus::Failed(e.to_string()),
        }
    }

    /// Move selection up, wrapping to the bottom.
    pub fn move_up(&mut self) {
        if self.movies.is_empty() {
            return;
        }
        self.selected_index = match self.selected_index {
            0 => self.movies.len() - 1,
            i => i - 1,
        };
    }

    /// Move selection down, wrapping to the top.
    pub fn move_down(&mut self) {
        if self.movies.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.movies.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Endpoint;
    use crate::components::capture_logs;
    use serde_json::json;

    fn loaded_panel() -> Recommendations {
        let mut panel = Recommendations::new(&Config::default());
        let request = panel.mount();
        panel.on_response(request.seq, Ok(vec![Movie::new("Heat", 1995)]));
        panel
    }

    #[test]
    fn test_mount_requests_fixed_query() {
        let mut panel = Recommendations::new(&Config::default());
        let request = panel.mount();
        assert_eq!(
            serde_json::to_value(&request.body).unwrap(),
            json!({"min_rating": 3, "genre": "Action", "year": 2000, "page": 1, "limit": 10})
        );
    }

    #[test]
    fn test_total_pages_from_assumed_total() {
        let mut panel = Recommendations::new(&Config::default());
        assert_eq!(panel.pagination.total_pages, 1);
        let request = panel.mount();
        panel.on_response(request.seq, Ok(Vec::new()));
        assert_eq!(panel.pagination.total_pages, 10);
    }

    #[test]
    fn test_page_button_requests_that_page() {
        let mut panel = loaded_panel();
        for k in [2, 7, 10, 1] {
            let request = panel.apply(PageAction::Page(k)).unwrap();
            assert_eq!(request.body.page, k);
            assert_eq!(panel.pagination.current_page, k);
        }
    }

    #[test]
    fn test_page_outside_range_is_ignored() {
        let mut panel = loaded_panel();
        assert!(panel.apply(PageAction::Page(0)).is_none());
        assert!(panel.apply(PageAction::Page(11)).is_none());
        assert_eq!(panel.pagination.current_page, 1);
    }

    #[test]
    fn test_next_and_prev_clamp() {
        let mut panel = loaded_panel();
        assert!(panel.apply(PageAction::Prev).is_none());

        let request = panel.apply(PageAction::Next).unwrap();
        assert_eq!(request.body.page, 2);

        panel.apply(PageAction::Last).unwrap();
        assert_eq!(panel.pagination.current_page, 10);
        assert!(panel.apply(PageAction::Next).is_none());
        assert_eq!(panel.pagination.current_page, 10);

        let request = panel.apply(PageAction::Prev).unwrap();
        assert_eq!(request.body.page, 9);
        let request = panel.apply(PageAction::First).unwrap();
        assert_eq!(request.body.page, 1);
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut panel = loaded_panel();
        let slow = panel.apply(PageAction::Page(2)).unwrap();
        let fast = panel.apply(PageAction::Page(3)).unwrap();

        assert_eq!(
            panel.on_response(fast.seq, Ok(vec![Movie::new("Page three", 2001)])),
            FetchStatus::Applied(1)
        );
        assert_eq!(
            panel.on_response(slow.seq, Ok(vec![Movie::new("Page two", 2000)])),
            FetchStatus::Stale
        );
        assert_eq!(panel.movies[0].title(), "Page three");
    }

    #[test]
    fn test_failure_keeps_previous_page() {
        let mut panel = loaded_panel();
        let request = panel.apply(PageAction::Next).unwrap();
        let err = ApiError::UnexpectedShape {
            endpoint: Endpoint::Recommend,
            found: "an object",
        };
        assert!(matches!(
            panel.on_response(request.seq, Err(err)),
            FetchStatus::Failed(_)
        ));
        assert_eq!(panel.movies[0].title(), "Heat");
    }

    #[test]
    fn test_selection_wraps() {
        let mut panel = Recommendations::new(&Config::default());
        let request = panel.mount();
        panel.on_response(
            request.seq,
            Ok(vec![
                Movie::new("A", 1990),
                Movie::new("B", 1991),
                Movie::new("C", 1992),
            ]),
        );
        panel.move_up();
        assert_eq!(panel.movies[panel.selected_index].title(), "C");
        panel.move_down();
        assert_eq!(panel.selected_index, 0);
        panel.move_down();
        assert_eq!(panel.movies[panel.selected_index].title(), "B");
    }

    #[test]
    fn test_stale_failure_is_still_logged() {
        let mut panel = loaded_panel();
        let slow = panel.apply(PageAction::Page(2)).unwrap();
        panel.apply(PageAction::Page(3)).unwrap();
        let err = ApiError::UnexpectedShape {
            endpoint: Endpoint::Recommend,
            found: "null",
        };

        let mut status = None;
        let logs = capture_logs(|| status = Some(panel.on_response(slow.seq, Err(err))));

        assert_eq!(status, Some(FetchStatus::Stale));
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("Error fetching recommendations"));
        assert!(logs.contains("stale=true"));
        assert_eq!(panel.movies[0].title(), "Heat");
    }
}
