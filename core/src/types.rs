//! Result types returned by the annotate operation.

use serde_json::Value;

/// Output of `CoreNlpClient::annotate`.
///
/// `Json` when the request asked for `outputFormat: json`, otherwise the
/// raw body in whatever format the server produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Json(Value),
    Text(String),
}

impl Annotation {
    pub fn is_json(&self) -> bool {
        matches!(self, Annotation::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Annotation::Json(value) => Some(value),
            Annotation::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Annotation::Text(text) => Some(text),
            Annotation::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Annotation::Json(value) => Some(value),
            Annotation::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Annotation::Text(text) => Some(text),
            Annotation::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accessors_match_variant() {
        let json = Annotation::Json(json!({"sentences": []}));
        assert!(json.is_json());
        assert_eq!(json.as_json(), Some(&json!({"sentences": []})));
        assert_eq!(json.as_text(), None);

        let text = Annotation::Text("Sentence #1".to_string());
        assert!(!text.is_json());
        assert_eq!(text.as_text(), Some("Sentence #1"));
        assert_eq!(text.clone().into_json(), None);
        assert_eq!(text.into_text().as_deref(), Some("Sentence #1"));
    }
}
