//! Synchronous client for the Stanford CoreNLP server.
//!
//! # Overview
//! Turns a text plus a `Properties` mapping into an HTTP request against a
//! running CoreNLP server and turns the reply into either parsed JSON or raw
//! text. All NLP work happens in the server; this crate only translates
//! requests and classifies failures.
//!
//! # Design
//! - `CoreNlpClient` is stateless apart from its server address.
//! - Each operation has a `build_*` (produces request) and `parse_*`
//!   (consumes response) half; the `Transport` trait performs the I/O in
//!   between, with `UreqTransport` as the blocking default.
//! - `annotate` probes the server first and fails with
//!   `CoreNlpError::NoServer` when nothing is listening.
//! - No retries, pooling or streaming. Every failure goes straight back to
//!   the caller.
//!
//! ```no_run
//! use corenlp_core::{CoreNlpClient, Properties};
//!
//! let client = CoreNlpClient::new("http://localhost:9000");
//! let props = Properties::new()
//!     .with("annotators", "tokenize,ssplit,pos")
//!     .with("outputFormat", "json");
//! let annotation = client.annotate("The cat sat.", &props)?;
//! # Ok::<(), corenlp_core::CoreNlpError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod properties;
pub mod transport;
pub mod types;

pub use client::CoreNlpClient;
pub use config::{ClientConfig, PropertiesEncoding};
pub use error::{CoreNlpError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use properties::Properties;
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::Annotation;
