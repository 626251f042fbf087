//! Typed errors for banner-tools.
//!
//! Per-identifier failures never abort a batch: the resolver hands each one
//! back to the caller alongside the Banner ID it belongs to. Only
//! [`BannerError::MissingEnv`] is fatal, and it is raised before any network
//! activity. Glue code in `main.rs` uses `anyhow`; the library exposes these
//! `thiserror` types.

use std::error::Error as StdError;
use std::time::Duration;

/// Errors that banner-tools surfaces to the user.
///
/// Every variant renders an actionable message *and* maps to a stable JSON
/// `error_type` string via [`BannerError::error_type`].
#[derive(Debug, thiserror::Error)]
pub enum BannerError {
    /// Required environment variable is unset or empty.
    #[error("{var} environment variable not set{hint}")]
    MissingEnv { var: &'static str, hint: &'static str },

    /// The identifier cannot be used to build a request (e.g. an empty token
    /// from `1,,2`).
    #[error("invalid banner id '{banner_id}': {reason}")]
    InvalidBannerId { banner_id: String, reason: String },

    /// The shared HTTP client could not be constructed.
    #[error("error building http client")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// The request URL or headers could not be assembled.
    #[error("error creating request for {url}")]
    RequestBuild {
        banner_id: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connection, DNS, or TLS failure while sending the request.
    #[error("request failed")]
    Transport {
        banner_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured per-request timeout elapsed.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        banner_id: String,
        timeout: Duration,
    },

    /// The response headers arrived but the body could not be read.
    #[error("error reading response")]
    BodyRead {
        banner_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the expected JSON envelope.
    #[error("failed to unmarshal json")]
    Decode {
        banner_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with a non-200 `statusCode`.
    #[error("banner response code {status}: {message}")]
    Rejected {
        banner_id: String,
        status: i64,
        message: String,
    },

    /// The API reported success but carried no `duckID`.
    #[error("banner response code 200 but no duckID for '{banner_id}'")]
    MissingDuckId { banner_id: String },

    /// The resolution task panicked or was cancelled before reporting.
    #[error("lookup task for '{banner_id}' did not complete: {detail}")]
    TaskFailed { banner_id: String, detail: String },
}

impl BannerError {
    /// Stable machine-readable tag used in `--json` output.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingEnv { .. } => "MissingEnv",
            Self::ClientBuild { .. } => "ClientBuild",
            Self::InvalidBannerId { .. } => "InvalidBannerId",
            Self::RequestBuild { .. } => "RequestBuild",
            Self::Transport { .. } => "Transport",
            Self::Timeout { .. } => "Timeout",
            Self::BodyRead { .. } => "BodyRead",
            Self::Decode { .. } => "Decode",
            Self::Rejected { .. } => "Rejected",
            Self::MissingDuckId { .. } => "MissingDuckId",
            Self::TaskFailed { .. } => "TaskFailed",
        }
    }

    /// Message followed by every underlying cause, `: `-separated.
    ///
    /// Causes whose text already appears earlier in the chain are skipped,
    /// since `reqwest` repeats parts of its own message in its sources.
    pub fn render_chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            let text = err.to_string();
            if !rendered.contains(&text) {
                rendered.push_str(": ");
                rendered.push_str(&text);
            }
            cause = err.source();
        }
        rendered
    }
}
