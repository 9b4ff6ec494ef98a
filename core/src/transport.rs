//! Executing `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the seam between the pure request/response layer and real
//! I/O. `UreqTransport` is the blocking implementation used by default; tests
//! substitute scripted transports to observe exactly which requests were
//! issued.
//!
//! A transport never interprets status codes. Every response that arrives,
//! 4xx and 5xx included, is returned as data. Only failures to complete the
//! exchange become `TransportError`, split into "could not connect" and
//! everything else so the client can recognise a missing server.

use std::io;

use thiserror::Error;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Default cap on response body size.
pub const DEFAULT_BODY_LIMIT: u64 = 64 * 1024 * 1024;

/// Failure to complete an HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No connection could be established.
    #[error("cannot connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// The connection was made but the exchange failed.
    #[error("request to {url} failed: {message}")]
    Other { url: String, message: String },
}

impl TransportError {
    pub fn is_connect(&self) -> bool {
        matches!(self, TransportError::Connect { .. })
    }
}

/// Performs one HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_body_limit(DEFAULT_BODY_LIMIT)
    }

    pub fn with_body_limit(body_limit: u64) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, body_limit }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let body = request.body.as_deref().map(str::as_bytes);
        let result = match request.method {
            HttpMethod::Get => {
                let builder = decorate(self.agent.get(&request.url), request);
                match body {
                    Some(bytes) => builder.force_send_body().send(bytes),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => {
                let builder = decorate(self.agent.post(&request.url), request);
                match body {
                    Some(bytes) => builder.send(bytes),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| classify(&request.url, e))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(|e| classify(&request.url, e))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn decorate<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn classify(url: &str, error: ureq::Error) -> TransportError {
    let connect = match &error {
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed | ureq::Error::BadUri(_) => true,
        ureq::Error::Io(e) => matches!(
            e.kind(),
            io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::AddrNotAvailable
        ),
        _ => false,
    };
    let url = url.to_string();
    let message = error.to_string();
    if connect {
        TransportError::Connect { url, message }
    } else {
        TransportError::Other { url, message }
    }
}
