//! Error types for the CoreNLP client.
//!
//! # Design
//! Two failures are specific to this client. `NoServer` is raised only by
//! the liveness probe in `annotate` and tells the caller how to start the
//! server. `Server` covers every status >= 400 from any endpoint, carrying
//! the reason phrase and the unparsed body. Everything else is either a JSON
//! decode failure or a transport failure passed through unchanged.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by `CoreNlpClient`.
#[derive(Debug, Error)]
pub enum CoreNlpError {
    /// The probe could not open a connection to the server.
    #[error(
        "Cannot connect to <{server_url}>.\nPlease start the CoreNLP server, e.g.:\n\
         $ cd stanford-corenlp-full-2015-12-09/\n\
         $ java -mx4g -cp \"*\" edu.stanford.nlp.pipeline.StanfordCoreNLPServer"
    )]
    NoServer { server_url: String },

    /// The server answered with a status >= 400.
    #[error("CoreNLP server error ({reason}): {message}")]
    Server { reason: String, message: String },

    /// A body that should have been JSON was not.
    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreNlpError {
    pub fn is_no_server(&self) -> bool {
        matches!(self, CoreNlpError::NoServer { .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, CoreNlpError::Server { .. })
    }

    /// Reason phrase of a server-reported failure.
    pub fn reason(&self) -> Option<&str> {
        match self {
            CoreNlpError::Server { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreNlpError>;
