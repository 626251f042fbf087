//! HTTP client for the Banner identifier endpoint.
//!
//! One [`BannerClient`] is built per process and shared by every lookup
//! task; the underlying `reqwest::Client` pools connections internally.
//!
//! A lookup moves through four stages, each with its own error variant:
//! build the request, send it, read the body, decode the envelope. Only the
//! envelope's `statusCode` decides success; the HTTP status line is only
//! logged.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, trace};

use crate::config::ApiContext;
use crate::error::BannerError;
use crate::model::DuckIdResponse;

/// Header carrying the API subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Something that can turn a Banner ID into a Duck ID.
///
/// [`BannerClient`] is the production implementation; tests substitute
/// in-memory fakes.
pub trait DuckIdLookup: Send + Sync + 'static {
    fn duck_id(
        &self,
        banner_id: &str,
    ) -> impl Future<Output = Result<String, BannerError>> + Send;
}

/// Client for `GET {base}/person/uo/duckid/{bannerID}`.
#[derive(Debug, Clone)]
pub struct BannerClient {
    ctx: ApiContext,
    http: Client,
}

impl BannerClient {
    /// Build a client for `ctx`.
    ///
    /// No timeout is applied unless the context carries one: without it a
    /// server that never answers stalls that lookup indefinitely.
    pub fn new(ctx: ApiContext) -> Result<Self, BannerError> {
        let mut builder = Client::builder();
        if let Some(timeout) = ctx.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| BannerError::ClientBuild { source })?;
        Ok(Self { ctx, http })
    }

    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    /// Endpoint URL for one identifier. The identifier is percent-encoded so
    /// it always occupies a single path segment.
    pub fn duck_id_url(&self, banner_id: &str) -> String {
        format!(
            "{}/person/uo/duckid/{}",
            self.ctx.endpoint_base(),
            urlencoding::encode(banner_id)
        )
    }

    /// Resolve one Banner ID.
    pub async fn fetch_duck_id(&self, banner_id: &str) -> Result<String, BannerError> {
        if banner_id.is_empty() {
            return Err(BannerError::InvalidBannerId {
                banner_id: banner_id.to_string(),
                reason: "identifier is empty".to_string(),
            });
        }

        let url = self.duck_id_url(banner_id);
        let request = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, self.ctx.api_key())
            .build()
            .map_err(|source| BannerError::RequestBuild {
                banner_id: banner_id.to_string(),
                url: url.clone(),
                source,
            })?;

        debug!(banner_id, url = %url, "sending duckid lookup");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| self.send_error(banner_id, source))?;

        let http_status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| self.read_error(banner_id, source))?;
        debug!(banner_id, %http_status, bytes = body.len(), "received duckid response");
        trace!(banner_id, body = %String::from_utf8_lossy(&body), "raw response body");

        interpret_response(banner_id, &body)
    }

    fn send_error(&self, banner_id: &str, source: reqwest::Error) -> BannerError {
        match self.timeout_error(banner_id, &source) {
            Some(err) => err,
            None => BannerError::Transport {
                banner_id: banner_id.to_string(),
                source,
            },
        }
    }

    fn read_error(&self, banner_id: &str, source: reqwest::Error) -> BannerError {
        match self.timeout_error(banner_id, &source) {
            Some(err) => err,
            None => BannerError::BodyRead {
                banner_id: banner_id.to_string(),
                source,
            },
        }
    }

    fn timeout_error(&self, banner_id: &str, source: &reqwest::Error) -> Option<BannerError> {
        if !source.is_timeout() {
            return None;
        }
        Some(BannerError::Timeout {
            banner_id: banner_id.to_string(),
            timeout: self.ctx.timeout().unwrap_or(Duration::ZERO),
        })
    }
}

impl DuckIdLookup for BannerClient {
    fn duck_id(
        &self,
        banner_id: &str,
    ) -> impl Future<Output = Result<String, BannerError>> + Send {
        self.fetch_duck_id(banner_id)
    }
}

/// Decode a response body and extract the Duck ID.
///
/// - not the envelope shape → [`BannerError::Decode`]
/// - `statusCode != 200` → [`BannerError::Rejected`] with the API's message
/// - `200` without `data.duckID` → [`BannerError::MissingDuckId`]
pub fn interpret_response(banner_id: &str, body: &[u8]) -> Result<String, BannerError> {
    let envelope: DuckIdResponse =
        serde_json::from_slice(body).map_err(|source| BannerError::Decode {
            banner_id: banner_id.to_string(),
            source,
        })?;

    let status = envelope.status();
    if status != 200 {
        return Err(BannerError::Rejected {
            banner_id: banner_id.to_string(),
            status,
            message: envelope.message.unwrap_or_default(),
        });
    }

    envelope
        .duck_id()
        .map(str::to_string)
        .ok_or_else(|| BannerError::MissingDuckId {
            banner_id: banner_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_returns_duck_id() {
        let body = br#"{"statusCode":200,"data":{"bannerID":"12345","duckID":"abc123"}}"#;
        assert_eq!(interpret_response("12345", body).unwrap(), "abc123");
    }

    #[test]
    fn non_200_is_rejected_with_message() {
        let body = br#"{"statusCode":404,"message":"not found"}"#;
        let err = interpret_response("99999", body).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("404"), "{rendered}");
        assert!(rendered.contains("not found"), "{rendered}");
        assert_eq!(err.error_type(), "Rejected");
    }

    #[test]
    fn missing_status_code_is_rejected_as_zero() {
        let err = interpret_response("1", br#"{"data":{"duckID":"x"}}"#).unwrap_err();
        assert!(matches!(err, BannerError::Rejected { status: 0, .. }));
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let err = interpret_response("1", b"<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.error_type(), "Decode");
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = interpret_response("1", br#"{"statusCode":"two hundred"}"#).unwrap_err();
        assert_eq!(err.error_type(), "Decode");
    }

    #[test]
    fn success_without_duck_id_is_reported() {
        let err = interpret_response("1", br#"{"statusCode":200,"data":{}}"#).unwrap_err();
        assert_eq!(err.error_type(), "MissingDuckId");
    }

    #[test]
    fn url_uses_https_and_encodes_identifier() {
        let client = BannerClient::new(ApiContext::new("k", "api.example.edu")).unwrap();
        assert_eq!(
            client.duck_id_url("951000001"),
            "https://api.example.edu/person/uo/duckid/951000001"
        );
        assert_eq!(
            client.duck_id_url("a/b c"),
            "https://api.example.edu/person/uo/duckid/a%2Fb%20c"
        );
    }

    #[test]
    fn client_build_reports_typed_error() {
        let ctx = ApiContext::new("k", "api.example.edu")
            .with_timeout(Some(std::time::Duration::from_secs(5)));
        let built: Result<BannerClient, BannerError> = BannerClient::new(ctx);
        let client = built.unwrap();
        assert_eq!(
            client.context().timeout(),
            Some(std::time::Duration::from_secs(5))
        );
    }

    #[tokio::test]
    async fn empty_identifier_fails_without_network() {
        let client = BannerClient::new(ApiContext::new("k", "http://127.0.0.1:9")).unwrap();
        let err = client.fetch_duck_id("").await.unwrap_err();
        assert_eq!(err.error_type(), "InvalidBannerId");
    }
}
