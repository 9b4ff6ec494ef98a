//! Client operations against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in its own thread and drives the
//! client through the real `UreqTransport`. The server's journal is checked
//! to confirm what actually went over the wire.

use std::net::SocketAddr;

use corenlp_core::{Annotation, CoreNlpClient, CoreNlpError, Properties, PropertiesEncoding};
use mock_server::{app_with, Behaviour, Journal};
use serde_json::json;

/// Serve `behaviour` on a random local port and return its address and journal.
fn spawn(behaviour: Behaviour) -> (SocketAddr, Journal) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let journal = Journal::default();
    let router = app_with(behaviour, journal.clone());
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, router).await
        })
        .unwrap();
    });

    (addr, journal)
}

fn fixed(status: u16, body: &str) -> Behaviour {
    Behaviour::Fixed {
        status,
        body: body.to_string(),
    }
}

fn json_props() -> Properties {
    Properties::new()
        .with("annotators", "tokenize")
        .with("outputFormat", "json")
}

#[test]
fn annotate_json_end_to_end() {
    let (addr, journal) = spawn(fixed(200, r#"{"sentences":[]}"#));
    let client = CoreNlpClient::new(&format!("http://{addr}/"));
    assert_eq!(client.server_url(), format!("http://{addr}"));

    let result = client.annotate("hello world", &json_props()).unwrap();
    assert_eq!(result, Annotation::Json(json!({"sentences": []})));

    let seen = journal.blocking_read();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/");
    assert_eq!(seen[1].method, "POST");
    assert_eq!(seen[1].path, "/");
    assert_eq!(
        seen[1].query_param("properties"),
        Some("{'annotators': 'tokenize', 'outputFormat': 'json'}")
    );
    assert_eq!(seen[1].header("connection"), Some("close"));
    assert_eq!(seen[1].body, "hello world");
}

#[test]
fn annotate_against_canned_server() {
    let (addr, _) = spawn(Behaviour::Canned);
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    let doc = client
        .annotate("The cat sat. It purred.", &json_props())
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(doc, json!({"sentences": []}));

    let text = client
        .annotate("The cat sat.", &Properties::new())
        .unwrap()
        .into_text()
        .unwrap();
    assert_eq!(text, "The cat sat.");
}

#[test]
fn annotate_text_is_returned_byte_for_byte() {
    let body = "  raw\toutput\n with {braces} and ünïcode\n";
    let (addr, _) = spawn(fixed(200, body));
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    let result = client.annotate("x", &Properties::new().with("annotators", "pos")).unwrap();
    assert_eq!(result.as_text(), Some(body));
}

#[test]
fn annotate_sends_json_properties_when_configured() {
    let (addr, journal) = spawn(Behaviour::Canned);
    let client = CoreNlpClient::new(&format!("http://{addr}")).with_properties_encoding(PropertiesEncoding::Json);

    let result = client.annotate("hi there", &json_props()).unwrap();
    assert!(result.is_json());
    assert_eq!(
        journal.blocking_read()[1].query_param("properties"),
        Some(r#"{"annotators":"tokenize","outputFormat":"json"}"#)
    );
}

#[test]
fn tokensregex_end_to_end() {
    let (addr, journal) = spawn(fixed(200, r#"{"matches":[]}"#));
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    let result = client.tokensregex("the cat sat", "[]", "").unwrap();
    assert_eq!(result, json!({"matches": []}));

    let seen = journal.blocking_read();
    assert_eq!(seen.len(), 1, "regex calls must not probe");
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/tokensregex");
    assert_eq!(seen[0].query_param("pattern"), Some("[]"));
    assert_eq!(seen[0].query_param("filter"), Some(""));
    assert_eq!(seen[0].body, "the cat sat");
}

#[test]
fn semgrex_against_canned_server() {
    let (addr, journal) = spawn(Behaviour::Canned);
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    let result = client.semgrex("the cat sat", "{tag:VBD}", "False").unwrap();
    assert_eq!(result, json!({"sentences": []}));

    let seen = journal.blocking_read();
    assert_eq!(seen[0].path, "/semgrex");
    assert_eq!(seen[0].query_param("pattern"), Some("{tag:VBD}"));
    assert_eq!(seen[0].query_param("filter"), Some("False"));
}

#[test]
fn reason_is_the_standard_phrase_for_the_status() {
    let (addr, _) = spawn(fixed(418, "short and stout"));
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    let err = client.tokensregex("x", "[]", "").unwrap_err();
    assert_eq!(err.reason(), Some("I'm a teapot"));
}

#[test]
fn regex_plain_text_reply_is_a_decode_error() {
    let (addr, _) = spawn(fixed(200, "not json at all"));
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    assert!(matches!(client.tokensregex("x", "[]", "").unwrap_err(), CoreNlpError::Decode(_)));
    assert!(matches!(client.semgrex("x", "{}", "").unwrap_err(), CoreNlpError::Decode(_)));
}

#[test]
fn server_errors_are_classified_for_every_operation() {
    let (addr, _) = spawn(fixed(500, "boom"));
    let client = CoreNlpClient::new(&format!("http://{addr}"));

    let errors = vec![
        client.annotate("x", &json_props()).unwrap_err(),
        client.tokensregex("x", "[]", "").unwrap_err(),
        client.semgrex("x", "{}", "").unwrap_err(),
    ];
    for err in errors {
        match err {
            CoreNlpError::Server { reason, message } => {
                assert_eq!(reason, "Internal Server Error");
                assert_eq!(message, "boom");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }
}

#[test]
fn annotate_without_server_reports_address() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CoreNlpClient::new(&format!("http://{addr}/"));
    let err = client.annotate("hello", &Properties::new()).unwrap_err();
    match &err {
        CoreNlpError::NoServer { server_url } => assert_eq!(server_url, &format!("http://{addr}")),
        other => panic!("expected NoServer, got {other:?}"),
    }
    assert!(err.to_string().contains("Please start the CoreNLP server"));
}
