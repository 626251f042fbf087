//! Wire envelope and command-level types.
//!
//! The Banner API wraps every payload in the same envelope:
//! `{"statusCode": int, "message": string, "data": {...}}`. All fields are
//! optional on the wire; failed lookups typically omit `data` entirely.

use serde::{Deserialize, Serialize};

use crate::error::BannerError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response envelope for `GET /person/uo/duckid/{bannerID}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuckIdResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DuckIdResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
}

/// Payload of a successful lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuckIdResponseData {
    #[serde(rename = "bannerID", default, skip_serializing_if = "Option::is_none")]
    pub banner_id: Option<String>,
    #[serde(rename = "duckID", default, skip_serializing_if = "Option::is_none")]
    pub duck_id: Option<String>,
}

impl DuckIdResponse {
    /// Status code as reported by the API; an absent code reads as `0`.
    pub fn status(&self) -> i64 {
        self.status_code.unwrap_or_default()
    }

    pub fn duck_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.duck_id.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Per-identifier outcome
// ---------------------------------------------------------------------------

/// Outcome of resolving one Banner ID.
#[derive(Debug)]
pub struct Resolution {
    /// The identifier as requested (after trimming).
    pub banner_id: String,
    /// The Duck ID, or why it could not be obtained.
    pub outcome: Result<String, BannerError>,
}

impl Resolution {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// JSON line for `--json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.outcome {
            Ok(duck_id) => serde_json::json!({
                "ok": true,
                "banner_id": self.banner_id,
                "duck_id": duck_id,
            }),
            Err(err) => serde_json::json!({
                "ok": false,
                "banner_id": self.banner_id,
                "error_type": err.error_type(),
                "message": err.render_chain(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Term / roster queries
// ---------------------------------------------------------------------------

/// Which academic term the `term` command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSelector {
    Current,
    Next,
}

impl TermSelector {
    pub fn from_next_flag(next: bool) -> Self {
        if next { Self::Next } else { Self::Current }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Next => "next",
        }
    }
}

/// A class roster request: one section (CRN) within one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterQuery {
    pub term_code: String,
    pub crn: String,
}

impl RosterQuery {
    pub fn new(term_code: impl Into<String>, crn: impl Into<String>) -> Self {
        Self {
            term_code: term_code.into(),
            crn: crn.into(),
        }
    }
}
