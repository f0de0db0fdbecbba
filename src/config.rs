//! Configuration management for the movie recommendation TUI.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages the service endpoint, pagination settings and the fixed queries
//! used by the recommendations and analytics panels.

use crate::api::FilterCriteria;
use anyhow::{Context, Result};
use dirs::{cache_dir, config_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used under the platform config and cache directories.
const APP_DIR: &str = "movie-rec-tui";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the recommendation service
    pub base_url: String,
    /// Per-request timeout in seconds (0 disables the timeout)
    pub request_timeout_secs: u64,
    /// Number of movies requested per recommendations page
    pub page_size: u32,
    /// Result count the page count is derived from; the service reports none
    pub assumed_total_results: u32,
    /// Filter sent with every `/recommend` request
    pub recommend_query: FilterCriteria,
    /// Filter sent with the one-off `/analytics` request of the chart panel
    pub analytics_query: FilterCriteria,
    /// Log file path (relative to cache dir or absolute)
    pub log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            page_size: 10,
            assumed_total_results: 100,
            recommend_query: FilterCriteria {
                min_rating: 3.0,
                genre: Some("Action".to_string()),
                year: Some(2000),
            },
            analytics_query: FilterCriteria {
                min_rating: 3.0,
                genre: Some("Action".to_string()),
                year: Some(1995),
            },
            log_path: "movie-rec-tui.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/movie-rec-tui/config.jsonc`
    /// 3. `~/.config/movie-rec-tui/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| "Failed to deserialize config")?;

        Ok(config)
    }

    /// Save configuration to file.
    ///
    /// # Details
    /// Creates config directory if it doesn't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get default configuration file path.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - `$XDG_CONFIG_HOME/movie-rec-tui/config.jsonc` or
    ///   `~/.config/movie-rec-tui/config.jsonc`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join(APP_DIR).join("config.jsonc"))
    }

    /// Get log file path.
    ///
    /// # Details
    /// If log_path is absolute, returns it as-is.
    /// Otherwise, returns path relative to the cache directory.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        let log_path = Path::new(&self.log_path);
        if log_path.is_absolute() {
            Ok(log_path.to_path_buf())
        } else {
            let cache_dir = cache_dir()
                .ok_or_else(|| anyhow::anyhow!("Failed to determine cache directory"))?;
            Ok(cache_dir.join(APP_DIR).join(&self.log_path))
        }
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Page size with a floor of one, so page math never divides by zero.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

/// Strip `//` line comments from JSONC text.
///
/// A `//` preceded by an odd number of quotes on its line is treated as
/// part of a string and kept (escaped quotes are not handled).
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            line.match_indices("//")
                .map(|(pos, _)| pos)
                .find(|&pos| line[..pos].matches('"').count() % 2 == 0)
                .map_or(line, |pos| line[..pos].trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.assumed_total_results, 100);
        assert_eq!(config.recommend_query.genre.as_deref(), Some("Action"));
        assert_eq!(config.recommend_query.year, Some(2000));
        assert_eq!(config.analytics_query.year, Some(1995));
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let config = Config {
            base_url: "http://localhost:8080".to_string(),
            page_size: 20,
            ..Config::default()
        };

        config.save(Some(&config_path)).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.base_url, "http://localhost:8080");
        assert_eq!(loaded.page_size, 20);
        assert_eq!(loaded.recommend_query, config.recommend_query);
    }

    #[test]
    fn test_config_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let jsonc_content = r#"{
            // Where the recommendation service listens
            "base_url": "http://10.0.0.2:5000",
            "analytics_query": { "min_rating": 4, "genre": null, "year": null }
        }"#;

        fs::write(&config_path, jsonc_content).unwrap();

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.base_url, "http://10.0.0.2:5000");
        assert_eq!(loaded.analytics_query.min_rating, 4.0);
        assert!(loaded.analytics_query.genre.is_none());
        // Untouched fields keep their defaults
        assert_eq!(loaded.page_size, 10);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load(Some(&temp_dir.path().join("absent.jsonc"))).unwrap();
        assert_eq!(loaded.base_url, Config::default().base_url);
    }

    #[test]
    fn test_strip_comments_keeps_urls_in_strings() {
        let stripped = strip_line_comments(r#"  "base_url": "http://host:1" // remote"#);
        assert_eq!(stripped, r#"  "base_url": "http://host:1""#);
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.request_timeout().is_none());
        assert_eq!(
            Config::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_log_file_path_absolute() {
        let config = Config {
            log_path: "/tmp/movie.log".to_string(),
            ..Config::default()
        };
        assert_eq!(config.log_file_path().unwrap(), PathBuf::from("/tmp/movie.log"));
    }
}
