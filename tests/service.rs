//! HTTP contract of the compliment service client, against an in-process
//! axum server.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use elogio::config::DEFAULT_EMPTY_RESPONSE_COMPLIMENT;
use elogio::pipeline::generate::{ComplimentGenerator, ComplimentService};
use elogio::GenerationError;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn chat(State(reply): State<Reply>, Json(body): Json<Value>) -> (StatusCode, String) {
    reply.received.lock().unwrap().push(body);
    tokio::time::sleep(reply.delay).await;
    (reply.status, reply.body.clone())
}

/// Serve `POST /chat` with a canned answer; returns the endpoint URL and the
/// request bodies seen.
async fn serve(status: StatusCode, body: &str, delay: Duration) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/chat", post(chat)).with_state(Reply {
        status,
        body: body.to_string(),
        delay,
        received: received.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/chat"), received)
}

fn client(endpoint: &str, timeout_secs: Option<u64>) -> ComplimentService {
    ComplimentService::new(endpoint, DEFAULT_EMPTY_RESPONSE_COMPLIMENT, timeout_secs).unwrap()
}

#[tokio::test]
async fn message_is_returned_and_text_is_posted() {
    let (endpoint, received) = serve(
        StatusCode::OK,
        r#"{"message": "Você é incrível!"}"#,
        Duration::ZERO,
    )
    .await;

    let text = client(&endpoint, None)
        .generate("Ana Silva\nReact\n")
        .await
        .unwrap();

    assert_eq!(text, "Você é incrível!");
    assert_eq!(
        received.lock().unwrap().as_slice(),
        [json!({ "text": "Ana Silva\nReact\n" })]
    );
}

#[tokio::test]
async fn missing_or_empty_message_uses_default() {
    for body in [r#"{}"#, r#"{"message": ""}"#, r#"{"message": null}"#] {
        let (endpoint, _) = serve(StatusCode::OK, body, Duration::ZERO).await;
        let text = client(&endpoint, None).generate("cv").await.unwrap();
        assert_eq!(text, DEFAULT_EMPTY_RESPONSE_COMPLIMENT, "body {body}");
    }
}

#[tokio::test]
async fn error_status_is_a_failure() {
    let (endpoint, _) = serve(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message": "ignored"}"#,
        Duration::ZERO,
    )
    .await;

    let err = client(&endpoint, None).generate("cv").await.unwrap_err();
    assert!(
        matches!(err, GenerationError::Status { status: 500, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_failure() {
    let (endpoint, _) = serve(StatusCode::OK, "<html>oops</html>", Duration::ZERO).await;
    let err = client(&endpoint, None).generate("cv").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedBody { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    // Bind and drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/chat"), None)
        .generate("cv")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Transport { .. }));
}

#[tokio::test]
async fn configured_timeout_is_reported() {
    let (endpoint, _) = serve(
        StatusCode::OK,
        r#"{"message": "tarde demais"}"#,
        Duration::from_secs(3),
    )
    .await;

    let err = client(&endpoint, Some(1)).generate("cv").await.unwrap_err();
    assert!(matches!(err, GenerationError::Timeout { secs: 1 }), "got {err:?}");
}
