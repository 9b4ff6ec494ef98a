//! Request builders, response parsers and the executing client for the
//! CoreNLP server.
//!
//! # Design
//! `CoreNlpClient` holds only the server address, the properties encoding
//! and a `Transport`. Every operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, so the wire format can be checked without a network.
//! `annotate`, `tokensregex`, `semgrex` and `regex` run the full round trip
//! through the transport.
//!
//! `annotate` probes the server with a bare GET first and reports
//! `NoServer` if no connection can be made. The regex endpoints skip the
//! probe and always decode JSON, whatever the caller's output format.

use serde_json::Value;

use crate::config::{ClientConfig, PropertiesEncoding};
use crate::error::{CoreNlpError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::properties::Properties;
use crate::transport::{Transport, UreqTransport};
use crate::types::Annotation;

pub const TOKENSREGEX_ENDPOINT: &str = "/tokensregex";
pub const SEMGREX_ENDPOINT: &str = "/semgrex";

/// Synchronous, stateless client for a CoreNLP server.
#[derive(Debug, Clone)]
pub struct CoreNlpClient<T = UreqTransport> {
    server_url: String,
    encoding: PropertiesEncoding,
    transport: T,
}

impl CoreNlpClient {
    pub fn new(server_url: &str) -> Self {
        Self::with_transport(server_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(&config.server_url, UreqTransport::with_body_limit(config.body_limit))
            .with_properties_encoding(config.properties_encoding)
    }
}

impl<T: Transport> CoreNlpClient<T> {
    /// Drops a single trailing `/` from `server_url`.
    pub fn with_transport(server_url: &str, transport: T) -> Self {
        let server_url = server_url.strip_suffix('/').unwrap_or(server_url);
        Self {
            server_url: server_url.to_string(),
            encoding: PropertiesEncoding::default(),
            transport,
        }
    }

    pub fn with_properties_encoding(mut self, encoding: PropertiesEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn properties_encoding(&self) -> PropertiesEncoding {
        self.encoding
    }

    pub fn build_probe(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.server_url.clone(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_annotate(&self, text: &str, properties: &Properties) -> HttpRequest {
        let encoded = match self.encoding {
            PropertiesEncoding::Literal => properties.to_literal(),
            PropertiesEncoding::Json => properties.to_json(),
        };
        HttpRequest {
            method: HttpMethod::Post,
            url: self.server_url.clone(),
            query: vec![("properties".to_string(), encoded)],
            headers: vec![("Connection".to_string(), "close".to_string())],
            body: Some(text.to_string()),
        }
    }

    pub fn build_regex(&self, endpoint: &str, text: &str, pattern: &str, filter: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{endpoint}", self.server_url),
            query: vec![
                ("pattern".to_string(), pattern.to_string()),
                ("filter".to_string(), filter.to_string()),
            ],
            headers: Vec::new(),
            body: Some(text.to_string()),
        }
    }

    pub fn build_tokensregex(&self, text: &str, pattern: &str, filter: &str) -> HttpRequest {
        self.build_regex(TOKENSREGEX_ENDPOINT, text, pattern, filter)
    }

    pub fn build_semgrex(&self, text: &str, pattern: &str, filter: &str) -> HttpRequest {
        self.build_regex(SEMGREX_ENDPOINT, text, pattern, filter)
    }

    /// JSON when `properties` asks for `outputFormat: json`, raw text otherwise.
    pub fn parse_annotate(&self, properties: &Properties, response: HttpResponse) -> Result<Annotation> {
        let body = check_status(response)?;
        if properties.wants_json() {
            Ok(Annotation::Json(serde_json::from_str(&body)?))
        } else {
            Ok(Annotation::Text(body))
        }
    }

    pub fn parse_regex(&self, response: HttpResponse) -> Result<Value> {
        let body = check_status(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Annotate `text` with the annotators and options in `properties`.
    ///
    /// Pass `&Properties::new()` for server defaults.
    pub fn annotate(&self, text: &str, properties: &Properties) -> Result<Annotation> {
        self.probe()?;
        let response = self.send(&self.build_annotate(text, properties))?;
        self.parse_annotate(properties, response)
    }

    pub fn tokensregex(&self, text: &str, pattern: &str, filter: &str) -> Result<Value> {
        self.regex(TOKENSREGEX_ENDPOINT, text, pattern, filter)
    }

    pub fn semgrex(&self, text: &str, pattern: &str, filter: &str) -> Result<Value> {
        self.regex(SEMGREX_ENDPOINT, text, pattern, filter)
    }

    /// Run a pattern against `text` on the server's `endpoint`.
    pub fn regex(&self, endpoint: &str, text: &str, pattern: &str, filter: &str) -> Result<Value> {
        let response = self.send(&self.build_regex(endpoint, text, pattern, filter))?;
        self.parse_regex(response)
    }

    // The probe's status is ignored; only a failed connection matters.
    fn probe(&self) -> Result<()> {
        match self.transport.execute(&self.build_probe()) {
            Ok(_) => Ok(()),
            Err(e) if e.is_connect() => {
                tracing::warn!(server_url = %self.server_url, error = %e, "CoreNLP server unreachable");
                Err(CoreNlpError::NoServer {
                    server_url: self.server_url.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, url = %request.url, "received response");
        Ok(response)
    }
}

/// Return the body of a successful response, or a `Server` error.
fn check_status(response: HttpResponse) -> Result<String> {
    if response.is_ok() {
        return Ok(response.body);
    }
    Err(CoreNlpError::Server {
        reason: response.reason,
        message: response.body,
    })
}
