//! HTTP transport types for the host-does-IO layer.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `build_*` methods on `CoreNlpClient` produce `HttpRequest` values and the
//! `parse_*` methods consume `HttpResponse` values without touching the
//! network. A `Transport` sits between the two and performs the round trip.
//!
//! Query parameters are kept as unencoded pairs; percent-encoding is the
//! transport's job. All fields are owned so requests can be recorded and
//! replayed in tests.

/// HTTP method for a request. The CoreNLP server only needs two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase for `status`, e.g. `"Internal Server Error"`.
    ///
    /// `UreqTransport` fills this with the standard phrase for the status
    /// code, not the text of the server's status line, which ureq does not
    /// expose. Custom phrases sent by a server are therefore not seen.
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Anything below 400 counts as success, redirects included.
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }
}
