//! Client configuration.
//!
//! Values come from code, from a deserialized document, or from the
//! environment via `ClientConfig::from_env`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreNlpError, Result};
use crate::transport::DEFAULT_BODY_LIMIT;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:9000";

pub const SERVER_URL_VAR: &str = "CORENLP_SERVER_URL";
pub const PROPERTIES_ENCODING_VAR: &str = "CORENLP_PROPERTIES_ENCODING";
pub const BODY_LIMIT_VAR: &str = "CORENLP_BODY_LIMIT";

/// How the `properties` query parameter is encoded.
///
/// `Literal` is what deployed servers have always received. `Json` is an
/// opt-in alternative the server also understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertiesEncoding {
    #[default]
    Literal,
    Json,
}

impl FromStr for PropertiesEncoding {
    type Err = CoreNlpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(PropertiesEncoding::Literal),
            "json" => Ok(PropertiesEncoding::Json),
            other => Err(CoreNlpError::Config(format!(
                "unknown properties encoding {other:?}, expected \"literal\" or \"json\""
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    #[serde(default)]
    pub properties_encoding: PropertiesEncoding,
    #[serde(default = "default_body_limit")]
    pub body_limit: u64,
}

fn default_body_limit() -> u64 {
    DEFAULT_BODY_LIMIT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            properties_encoding: PropertiesEncoding::default(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Read configuration from `CORENLP_*` environment variables, falling
    /// back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(SERVER_URL_VAR) {
            config.server_url = url;
        }
        if let Some(encoding) = lookup(PROPERTIES_ENCODING_VAR) {
            config.properties_encoding = encoding.parse()?;
        }
        if let Some(limit) = lookup(BODY_LIMIT_VAR) {
            config.body_limit = limit.trim().parse().map_err(|_| {
                CoreNlpError::Config(format!("{BODY_LIMIT_VAR} must be a byte count, got {limit:?}"))
            })?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server_url, "http://localhost:9000");
        assert_eq!(config.properties_encoding, PropertiesEncoding::Literal);
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (SERVER_URL_VAR, "http://corenlp:9000/"),
            (PROPERTIES_ENCODING_VAR, "JSON"),
            (BODY_LIMIT_VAR, "1024"),
        ]))
        .unwrap();
        assert_eq!(config.server_url, "http://corenlp:9000/");
        assert_eq!(config.properties_encoding, PropertiesEncoding::Json);
        assert_eq!(config.body_limit, 1024);
    }

    #[test]
    fn rejects_unknown_encoding() {
        let err = ClientConfig::from_lookup(lookup(&[(PROPERTIES_ENCODING_VAR, "yaml")])).unwrap_err();
        assert!(matches!(err, CoreNlpError::Config(_)));
    }

    #[test]
    fn rejects_bad_body_limit() {
        let err = ClientConfig::from_lookup(lookup(&[(BODY_LIMIT_VAR, "lots")])).unwrap_err();
        assert!(err.to_string().contains(BODY_LIMIT_VAR));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"server_url":"http://nlp:9000","properties_encoding":"json"}"#).unwrap();
        assert_eq!(config.properties_encoding, PropertiesEncoding::Json);
        assert_eq!(config.body_limit, DEFAULT_BODY_LIMIT);
    }
}
