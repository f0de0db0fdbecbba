//! Recommendation service models and request bodies.
//!
//! Contains the filter criteria sent to the service, the request wrapper for
//! paginated recommendations and the movie records it returns.

use crate::api::error::ApiError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Minimum rating used when the form field is left empty.
pub const DEFAULT_MIN_RATING: f64 = 3.0;

/// Text shown for fields the service left out of a record.
pub const MISSING_FIELD: &str = "undefined";

/// Service endpoints consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Filtered movie list / rating analytics
    Analytics,
    /// Paginated recommendations
    Recommend,
}

impl Endpoint {
    /// Path of the endpoint relative to the service base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Analytics => "/analytics",
            Endpoint::Recommend => "/recommend",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Filter criteria narrowing a movie query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Rating floor
    #[serde(serialize_with = "serialize_number")]
    pub min_rating: f64,
    /// Genre name, `null` when unset
    pub genre: Option<String>,
    /// Release year, `null` when unset
    pub year: Option<i64>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_rating: DEFAULT_MIN_RATING,
            genre: None,
            year: None,
        }
    }
}

/// Body of a `/recommend` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    /// 1-indexed page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

/// 2^53: largest range where every integer is exactly representable.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

fn is_exact_int(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT_INT_LIMIT
}

/// Serialize whole numbers as JSON integers (`4`, not `4.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if is_exact_int(*value) {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Display text for a loosely typed response field.
///
/// # Details
/// Strings are shown as-is and numbers without a trailing `.0`. Anything
/// else, including a missing field, shows as [`MISSING_FIELD`].
pub fn display_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(n) if is_exact_int(n) => (n as i64).to_string(),
            _ => number.to_string(),
        },
        _ => MISSING_FIELD.to_string(),
    }
}

/// A movie record as returned by the service.
///
/// Field types are not checked: each field keeps the JSON value the service
/// sent and is formatted when displayed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Movie {
    pub movie_title: Option<Value>,
    pub release_year: Option<Value>,
    pub rating: Option<Value>,
}

/// Accepts a full record or a bare title string.
impl TryFrom<Value> for Movie {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(title) => Ok(Movie {
                movie_title: Some(Value::String(title)),
                ..Movie::default()
            }),
            Value::Object(mut record) => {
                let mut take = |key: &str| record.remove(key).filter(|v| !v.is_null());
                Ok(Movie {
                    movie_title: take("movie_title"),
                    release_year: take("release_year"),
                    rating: take("rating"),
                })
            }
            other => Err(format!(
                "expected a movie record or title, got {}",
                json_kind(&other)
            )),
        }
    }
}

impl Movie {
    /// Create a movie with a title and release year.
    #[cfg(test)]
    pub fn new(title: impl Into<String>, release_year: i32) -> Self {
        Self {
            movie_title: Some(Value::String(title.into())),
            release_year: Some(Value::from(release_year)),
            rating: None,
        }
    }

    /// Title for display.
    pub fn title(&self) -> String {
        display_field(self.movie_title.as_ref())
    }

    /// Release year for display; the service may send years as floats.
    pub fn format_release_year(&self) -> String {
        display_field(self.release_year.as_ref())
    }
}

/// Name of a JSON value's kind, for log and error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Decode a response body into a movie list.
///
/// # Errors
/// `UnexpectedShape` when the body is not a list, `Decode` when an element
/// is neither an object nor a string.
pub fn movies_from_value(endpoint: Endpoint, value: Value) -> Result<Vec<Movie>, ApiError> {
    if !value.is_array() {
        return Err(ApiError::UnexpectedShape {
            endpoint,
            found: json_kind(&value),
        });
    }
    serde_json::from_value(value).map_err(|source| ApiError::Decode { endpoint, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_criteria_whole_rating_is_integer() {
        let criteria = FilterCriteria {
            min_rating: 4.0,
            genre: Some("Comedy".to_string()),
            year: Some(2010),
        };
        assert_eq!(
            serde_json::to_string(&criteria).unwrap(),
            r#"{"min_rating":4,"genre":"Comedy","year":2010}"#
        );
    }

    #[test]
    fn test_filter_criteria_fractional_rating() {
        let criteria = FilterCriteria {
            min_rating: 3.5,
            ..FilterCriteria::default()
        };
        assert_eq!(
            serde_json::to_value(&criteria).unwrap(),
            json!({"min_rating": 3.5, "genre": null, "year": null})
        );
    }

    #[test]
    fn test_recommend_request_is_flat() {
        let request = RecommendRequest {
            criteria: FilterCriteria {
                min_rating: 3.0,
                genre: Some("Action".to_string()),
                year: Some(2000),
            },
            page: 1,
            limit: 10,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"min_rating": 3, "genre": "Action", "year": 2000, "page": 1, "limit": 10})
        );
    }

    #[test]
    fn test_movie_from_record_and_title() {
        let movies: Vec<Movie> = serde_json::from_value(json!([
            {"movie_title": "Heat", "release_year": 1995.0, "rating": 4},
            "Toy Story (1995)",
            {"rating": 2}
        ]))
        .unwrap();

        assert_eq!(movies[0].title(), "Heat");
        assert_eq!(movies[0].format_release_year(), "1995");
        assert_eq!(movies[0].rating, Some(json!(4)));
        assert_eq!(movies[1].title(), "Toy Story (1995)");
        assert_eq!(movies[1].format_release_year(), MISSING_FIELD);
        assert_eq!(movies[2].title(), MISSING_FIELD);
    }

    #[test]
    fn test_mistyped_fields_keep_the_list() {
        let movies = movies_from_value(
            Endpoint::Recommend,
            json!([
                {"movie_title": "Heat", "release_year": 1995},
                {"movie_title": "Ronin", "release_year": "1998"},
                {"movie_title": 1917, "release_year": [2019], "rating": null}
            ]),
        )
        .unwrap();

        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].title(), "Heat");
        assert_eq!(movies[0].format_release_year(), "1995");
        assert_eq!(movies[1].format_release_year(), "1998");
        assert_eq!(movies[2].title(), "1917");
        assert_eq!(movies[2].format_release_year(), MISSING_FIELD);
        assert_eq!(movies[2].rating, None);
    }

    #[test]
    fn test_display_field_formats() {
        assert_eq!(display_field(Some(&json!(2001.0))), "2001");
        assert_eq!(display_field(Some(&json!(3.5))), "3.5");
        assert_eq!(display_field(Some(&json!(true))), MISSING_FIELD);
        assert_eq!(display_field(Some(&Value::Null)), MISSING_FIELD);
        assert_eq!(display_field(None), MISSING_FIELD);
    }

    #[test]
    fn test_movies_from_value_rejects_object() {
        let err = movies_from_value(Endpoint::Analytics, json!({"error": "boom"})).unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnexpectedShape {
                found: "an object",
                ..
            }
        ));
    }

    #[test]
    fn test_movies_from_value_rejects_bad_element() {
        let err = movies_from_value(Endpoint::Recommend, json!([1, 2])).unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Analytics.to_string(), "/analytics");
        assert_eq!(Endpoint::Recommend.path(), "/recommend");
    }
}
