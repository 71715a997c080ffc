//! Client configuration.
//!
//! The backend base URL and session freshness window come from the
//! environment (`.env` files supported); the file-backed token store lives
//! under the platform cache directory.

use std::path::PathBuf;

use anyhow::Result;

/// Application name used for cache directory paths
const APP_NAME: &str = "studentlearn";

/// Default backend base URL (local development server)
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Default session freshness window in seconds.
/// Navigation bursts inside this window reuse the last successful
/// verification instead of hitting `/auth/me` again.
const DEFAULT_FRESHNESS_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub freshness_secs: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            freshness_secs: DEFAULT_FRESHNESS_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    /// Reads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let api_base_url = std::env::var("STUDENTLEARN_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let freshness_secs = std::env::var("STUDENTLEARN_FRESHNESS_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FRESHNESS_SECS);

        Self {
            api_base_url,
            freshness_secs,
        }
    }

    /// Directory for the file-backed token store.
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
