//! Analytics panel state.
//!
//! Fetches a fixed analytics query once and turns the answer into a chart
//! series of (title, rating) points.

use crate::api::models::{display_field, json_kind};
use crate::api::{ApiError, FilterCriteria};
use crate::components::FetchStatus;
use crate::config::Config;
use chrono::{DateTime, Local};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

/// Why a response could not be charted.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("no data available")]
    Empty,
    #[error("data format is incorrect: expected a list, got {0}")]
    NotAList(&'static str),
}

/// Labeled rating values drawn as a line chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// Movie titles, one per point
    pub labels: Vec<String>,
    /// Ratings; entries without a numeric rating are not plotted
    pub data: Vec<Option<f64>>,
}

impl ChartSeries {
    /// Dataset name shown in the chart legend.
    pub const NAME: &'static str = "Movie Ratings";

    /// Build a series from an `/analytics` response.
    ///
    /// # Errors
    /// `NotAList` for anything but a JSON list, `Empty` for an empty list.
    pub fn from_response(value: &Value) -> Result<Self, SeriesError> {
        let items = value
            .as_array()
            .ok_or_else(|| SeriesError::NotAList(json_kind(value)))?;
        if items.is_empty() {
            return Err(SeriesError::Empty);
        }

        let labels = items
            .iter()
            .map(|item| display_field(item.get("movie_title")))
            .collect();
        let data = items
            .iter()
            .map(|item| item.get("rating").and_then(Value::as_f64))
            .collect();

        Ok(Self { labels, data })
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Plottable points as (index, rating).
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, rating)| rating.map(|r| (i as f64, r)))
            .collect()
    }

    /// Upper bound of the rating axis: at least 5, rounded up.
    pub fn y_max(&self) -> f64 {
        self.data
            .iter()
            .flatten()
            .fold(5.0_f64, |max, &r| max.max(r))
            .ceil()
    }
}

/// Analytics panel state.
#[derive(Debug, Clone)]
pub struct Analytics {
    /// Series on screen; empty until a usable response arrives
    pub series: ChartSeries,
    /// When the series arrived
    pub loaded_at: Option<DateTime<Local>>,
    query: FilterCriteria,
    mounted: bool,
}

impl Analytics {
    /// Create the panel from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            series: ChartSeries::default(),
            loaded_at: None,
            query: config.analytics_query.clone(),
            mounted: false,
        }
    }

    /// Query to send when the panel first shows; `None` afterwards.
    pub fn mount(&mut self) -> Option<FilterCriteria> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.query.clone())
    }

    /// Apply the `/analytics` response.
    ///
    /// # Details
    /// An empty list or a non-list answer is logged and leaves the
    /// placeholder series in place.
    pub fn on_response(&mut self, result: Result<Value, ApiError>) -> FetchStatus {
        let value = match result {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, timeout = e.is_timeout(), "Error fetching analytics data");
                return FetchStatus::Failed(e.to_string());
            }
        };
        match ChartSeries::from_response(&value) {
            Ok(series) => {
                let count = series.labels.len();
                self.series = series;
                self.loaded_at = Some(Local::now());
                FetchStatus::Applied(count)
            }
            Err(e) => {
                error!(error = %e, "Analytics response not charted");
                FetchStatus::Failed(e.to_string())
            }
        }
    }
}
