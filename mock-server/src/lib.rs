//! Stand-in for the Stanford CoreNLP server.
//!
//! Serves the four routes the client talks to and records every request in
//! a `Journal` so tests can assert on the exact wire shape. No annotation is
//! performed: `Behaviour::Canned` answers with empty documents of the right
//! shape, and `Behaviour::Fixed` replaces every non-probe reply with a given
//! status and body.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub type Journal = Arc<RwLock<Vec<RecordedRequest>>>;

#[derive(Clone, Debug, Default)]
pub enum Behaviour {
    /// Empty JSON documents, or the submitted text echoed back when the
    /// request did not ask for JSON.
    #[default]
    Canned,
    /// Answer annotate and regex routes with this status and body.
    Fixed { status: u16, body: String },
}

#[derive(Clone)]
struct AppState {
    behaviour: Arc<Behaviour>,
    journal: Journal,
}

impl AppState {
    async fn record(
        &self,
        method: Method,
        uri: Uri,
        query: Vec<(String, String)>,
        headers: &HeaderMap,
        body: String,
    ) -> RecordedRequest {
        let request = RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query,
            headers: headers
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect(),
            body,
        };
        tracing::debug!(method = %request.method, path = %request.path, "request");
        self.journal.write().await.push(request.clone());
        request
    }

    fn fixed(&self) -> Option<Response> {
        match self.behaviour.as_ref() {
            Behaviour::Canned => None,
            Behaviour::Fixed { status, body } => {
                let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Some((status, body.clone()).into_response())
            }
        }
    }
}

pub fn app() -> Router {
    app_with(Behaviour::Canned, Journal::default())
}

pub fn app_with(behaviour: Behaviour, journal: Journal) -> Router {
    let state = AppState {
        behaviour: Arc::new(behaviour),
        journal,
    };
    Router::new()
        .route("/", get(probe).post(annotate))
        .route("/tokensregex", get(tokensregex))
        .route("/semgrex", get(semgrex))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn probe(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> &'static str {
    state.record(method, uri, query, &headers, body).await;
    "CoreNLP mock server\n"
}

async fn annotate(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = state.record(method, uri, query, &headers, body).await;
    if let Some(reply) = state.fixed() {
        return reply;
    }
    match request.query_param("properties") {
        Some(properties) if wants_json(properties) => Json(empty_document()).into_response(),
        _ => request.body.into_response(),
    }
}

async fn tokensregex(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.record(method, uri, query, &headers, body).await;
    state.fixed().unwrap_or_else(|| Json(empty_document()).into_response())
}

async fn semgrex(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.record(method, uri, query, &headers, body).await;
    state.fixed().unwrap_or_else(|| Json(empty_document()).into_response())
}

/// Accepts both the mapping-literal and the JSON properties encodings.
pub fn wants_json(properties: &str) -> bool {
    let compact: String = properties
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();
    compact.contains("'outputFormat':'json'")
}

fn empty_document() -> Value {
    json!({ "sentences": [] })
}
