//! Movie recommendation service integration module.
//!
//! Provides the HTTP client, wire models and error type for the
//! `/recommend` and `/analytics` endpoints.

pub mod client;
pub mod error;
pub mod models;

pub use client::MovieClient;
pub use error::ApiError;
pub use models::{Endpoint, FilterCriteria, Movie, RecommendRequest};
