//! Startup configuration: the shared API context.
//!
//! Built once from the environment before any command runs, then shared
//! read-only by every lookup task.

use std::fmt;
use std::time::Duration;

use crate::error::BannerError;

/// Environment variable carrying the API subscription key.
pub const API_KEY_VAR: &str = "BANNER_TOOLS_API_KEY";
/// Environment variable carrying the API host (e.g. `api.example.edu`).
pub const API_URL_VAR: &str = "BANNER_TOOLS_API_URL";

/// Credentials and endpoint shared by all lookups.
#[derive(Clone)]
pub struct ApiContext {
    api_key: String,
    api_url: String,
    timeout: Option<Duration>,
}

impl ApiContext {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            timeout: None,
        }
    }

    /// Read the context from the process environment.
    pub fn from_env() -> Result<Self, BannerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary variable lookup.
    ///
    /// The key is checked first, matching the order users are told about
    /// missing variables. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str, hint: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(BannerError::MissingEnv { var, hint })
        };

        let api_key = read(API_KEY_VAR, "")?;
        let api_url = read(API_URL_VAR, " ('api.example.edu')")?;
        Ok(Self::new(api_key, api_url))
    }

    /// Apply a per-request timeout. `None` keeps the unbounded default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Scheme-qualified base for endpoint URLs, without a trailing slash.
    ///
    /// A bare host gets `https://`; an explicit `http://` or `https://` is
    /// kept as given.
    pub fn endpoint_base(&self) -> String {
        let url = self.api_url.trim_end_matches('/');
        if url.starts_with("https://") || url.starts_with("http://") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
