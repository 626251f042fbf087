//! Mock Banner API shared by the integration tests.
//!
//! An axum router serving `GET /person/uo/duckid/:banner_id` with canned
//! replies keyed by Banner ID. It runs on its own thread and runtime so both
//! async client tests and blocking `assert_cmd` tests can point at it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

pub const NOT_FOUND: &str = r#"{"statusCode":404,"message":"not found"}"#;

/// Canned reply for one Banner ID.
#[derive(Debug, Clone)]
pub enum Reply {
    /// `application/json` body.
    Json(&'static str),
    /// `text/html` body, for non-JSON gateway pages.
    Raw(&'static str),
    /// Accept the request and never answer.
    Hang,
}

/// A request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub subscription_key: Option<String>,
}

struct MockState {
    routes: HashMap<String, Reply>,
    seen: Mutex<Vec<Seen>>,
}

pub struct MockApi {
    pub base: String,
    state: Arc<MockState>,
}

impl MockApi {
    /// Bind an ephemeral port and serve `routes` until the test process exits.
    /// Unknown IDs get [`NOT_FOUND`].
    pub fn start(routes: &[(&str, Reply)]) -> Self {
        let state = Arc::new(MockState {
            routes: routes
                .iter()
                .map(|(id, reply)| (id.to_string(), reply.clone()))
                .collect(),
            seen: Mutex::new(Vec::new()),
        });

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock api");
        listener
            .set_nonblocking(true)
            .expect("non-blocking mock listener");
        let base = format!("http://{}", listener.local_addr().unwrap());

        let app = Router::new()
            .route("/person/uo/duckid/:banner_id", get(duck_id))
            .with_state(Arc::clone(&state));

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock api runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("adopt mock listener");
                let _ = axum::serve(listener, app).await;
            });
        });

        Self { base, state }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.state.seen.lock().unwrap().len()
    }
}

async fn duck_id(
    State(state): State<Arc<MockState>>,
    Path(banner_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.seen.lock().unwrap().push(Seen {
        path: uri.path().to_string(),
        subscription_key: headers
            .get("ocp-apim-subscription-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match state.routes.get(&banner_id).cloned() {
        Some(Reply::Json(body)) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Some(Reply::Raw(body)) => ([(header::CONTENT_TYPE, "text/html")], body).into_response(),
        Some(Reply::Hang) => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
        None => ([(header::CONTENT_TYPE, "application/json")], NOT_FOUND).into_response(),
    }
}
