//! Recommendation service client implementation.
//!
//! Handles the POST requests behind the filter form, the recommendations
//! panel and the analytics chart.

use crate::api::models::movies_from_value;
use crate::api::{ApiError, Endpoint, FilterCriteria, Movie, RecommendRequest};
use crate::config::Config;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Recommendation service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MovieClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl MovieClient {
    /// Create a new client from configuration.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Returns
    /// * `Result<MovieClient>` - New client or error
    ///
    /// # Details
    /// Requires a base URL. Applies the configured request timeout, if any.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(anyhow::anyhow!(
                "Service base URL is required. Please set base_url in config.jsonc"
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Full URL of an endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Fetch the raw `/analytics` response for the given criteria.
    ///
    /// # Details
    /// The body is returned undecoded: the analytics chart treats a non-list
    /// answer as a soft failure rather than an error.
    pub async fn analytics(&self, criteria: &FilterCriteria) -> Result<Value, ApiError> {
        self.post_json(Endpoint::Analytics, criteria).await
    }

    /// Fetch the movies matching the filter form's criteria.
    ///
    /// # Details
    /// The service has no dedicated filter endpoint; `/analytics` returns the
    /// filtered records.
    pub async fn filter_movies(&self, criteria: &FilterCriteria) -> Result<Vec<Movie>, ApiError> {
        let value = self.analytics(criteria).await?;
        movies_from_value(Endpoint::Analytics, value)
    }

    /// Fetch one page of recommendations.
    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<Movie>, ApiError> {
        let value = self.post_json(Endpoint::Recommend, request).await?;
        movies_from_value(Endpoint::Recommend, value)
    }

    /// POST a JSON body and decode the JSON response.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint_url(endpoint);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint,
                status,
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        serde_json::from_str(&text).map_err(|source| ApiError::Decode { endpoint, source })
    }
}
