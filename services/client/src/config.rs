//! Client configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `blog-client.toml` in the working directory, then `BLOG_`-prefixed
//! environment variables.

use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default REST API root
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

const DEFAULT_SESSION_FILE: &str = ".blog-session.json";

/// Client configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// REST API root, e.g. `http://localhost:8000/api/v1`
    pub api_base_url: String,
    /// File the CLI persists the session in
    pub session_file: PathBuf,
    /// Per-request timeout; no timeout when absent
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `blog-client.toml` and the environment
    ///
    /// # Environment Variables
    /// - `BLOG_API_BASE_URL`: REST API root (default: "http://localhost:8000/api/v1")
    /// - `BLOG_SESSION_FILE`: Session file path (default: ".blog-session.json")
    /// - `BLOG_REQUEST_TIMEOUT_SECS`: Request timeout in seconds (default: none)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("blog-client")
    }

    /// Same as [`ClientConfig::load`] with an explicit config file stem
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("session_file", DEFAULT_SESSION_FILE)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("BLOG").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
