//! Completion gateway tests against a local mock Ollama backend.

use std::time::Duration;

use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;

use phrasebot::gateway::{CompletionError, CompletionGateway};

/// Bind a mock backend on an ephemeral port and return its base URL.
async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway(host: &str) -> CompletionGateway {
    CompletionGateway::new(host, "test-model", 100, 0.7, 0.9).unwrap()
}

fn respond_with(body: Value) -> Router {
    Router::new().route(
        "/api/generate",
        post(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}

#[tokio::test]
async fn successful_completion_is_trimmed() {
    let host = spawn_backend(respond_with(json!({"response": "  world \n"}))).await;

    let result = gateway(&host).complete("hello").await;
    assert_eq!(result.unwrap(), "world");
}

#[tokio::test]
async fn request_payload_matches_the_generate_api() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let app = Router::new().route(
        "/api/generate",
        post(move |Json(body): Json<Value>| {
            let tx = tx.clone();
            async move {
                tx.send(body).ok();
                Json(json!({"response": "ok"}))
            }
        }),
    );
    let host = spawn_backend(app).await;

    gateway(&host).complete("  hello there  ").await.unwrap();

    let body = rx.recv().await.unwrap();
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["num_predict"], 100);
    assert!((body["options"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((body["options"]["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);

    // the trimmed user text is embedded in the prompt exactly once
    let prompt = body["prompt"].as_str().unwrap();
    assert_eq!(prompt.matches("hello there").count(), 1);
}

#[tokio::test]
async fn upstream_error_status_is_classified() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let host = spawn_backend(app).await;

    match gateway(&host).complete("hello").await {
        Err(CompletionError::Upstream(status)) => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_completion_is_classified() {
    let host = spawn_backend(respond_with(json!({"response": ""}))).await;
    assert!(matches!(
        gateway(&host).complete("hello").await,
        Err(CompletionError::EmptyOrMalformed)
    ));
}

#[tokio::test]
async fn whitespace_only_completion_is_classified() {
    let host = spawn_backend(respond_with(json!({"response": "  \n "}))).await;
    assert!(matches!(
        gateway(&host).complete("hello").await,
        Err(CompletionError::EmptyOrMalformed)
    ));
}

#[tokio::test]
async fn missing_completion_field_is_classified() {
    let host = spawn_backend(respond_with(json!({"done": true}))).await;
    assert!(matches!(
        gateway(&host).complete("hello").await,
        Err(CompletionError::EmptyOrMalformed)
    ));
}

#[tokio::test]
async fn non_json_success_body_is_classified() {
    let app = Router::new().route("/api/generate", post(|| async { "not json" }));
    let host = spawn_backend(app).await;

    assert!(matches!(
        gateway(&host).complete("hello").await,
        Err(CompletionError::EmptyOrMalformed)
    ));
}

#[tokio::test]
async fn stalled_response_body_is_classified_as_unreachable() {
    // raw socket so we can send 200 headers and then never the body
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = listener.accept().await.unwrap();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          content-type: application/json\r\n\
                          content-length: 100\r\n\r\n",
                    )
                    .await;
                // hold the connection open well past the client timeout
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });

    let gateway = CompletionGateway::with_timeout(
        &format!("http://{addr}"),
        "test-model",
        100,
        0.7,
        0.9,
        Duration::from_millis(300),
    )
    .unwrap();

    assert!(matches!(
        gateway.complete("hello").await,
        Err(CompletionError::Unreachable(_))
    ));
}

#[tokio::test]
async fn unreachable_backend_is_classified() {
    // grab a free port, then close it so connects are refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert!(matches!(
        gateway(&format!("http://{addr}")).complete("hello").await,
        Err(CompletionError::Unreachable(_))
    ));
}
