//! Integration tests for the Ollama client and the end-to-end pipeline.
//!
//! These tests start a real axum server on a random port that imitates the
//! Ollama `/api/generate` endpoint.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use promptsmith::api::{Provider, RetryConfig};
use promptsmith::frameworks::FrameworkCatalog;
use promptsmith::pipeline::{enhance, enhance_with_retry};
use promptsmith::OllamaClient;

/// Requests received by the fake server.
type Seen = Arc<Mutex<Vec<Value>>>;

/// Helper: serve `router` on port 0 and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Fake Ollama that answers each framework instruction with labeled fields.
async fn spawn_fake_ollama() -> (String, Seen) {
    async fn generate(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
        seen.lock().unwrap().push(body.clone());
        let prompt = body["prompt"].as_str().unwrap_or_default();
        let response = if prompt.contains("**CoT**") {
            "  - **Role:** a churn analyst\n- **Ask:** Explain why customers leave  "
        } else {
            "- **Audience:** the leadership team\n- **Tone:** calm and factual"
        };
        Json(json!({
            "model": body["model"],
            "response": response,
            "done": true,
            "prompt_eval_count": 42,
            "eval_count": 17
        }))
    }

    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/api/generate", post(generate))
        .with_state(seen.clone());
    let base = spawn(router).await;
    (format!("{base}/api/generate"), seen)
}

fn client(url: &str) -> OllamaClient {
    OllamaClient::new(url, "llama3:test").unwrap()
}

// ── Client ───────────────────────────────────────────────────────────

#[tokio::test]
async fn complete_sends_non_streaming_request_and_trims() {
    let (url, seen) = spawn_fake_ollama().await;

    let out = client(&url).complete("Apply **CoT** please").await.unwrap();
    assert_eq!(
        out,
        "- **Role:** a churn analyst\n- **Ask:** Explain why customers leave"
    );

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        json!({"model": "llama3:test", "prompt": "Apply **CoT** please", "stream": false})
    );
}

#[tokio::test]
async fn http_error_includes_status_and_body() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::NOT_FOUND, "model 'llama3:test' not found") }),
    );
    let url = format!("{}/api/generate", spawn(router).await);

    let err = client(&url).complete("hi").await.unwrap_err();
    assert!(err.starts_with("Ollama API HTTP 404"), "{err}");
    assert!(err.contains("model 'llama3:test' not found"), "{err}");
}

#[tokio::test]
async fn error_field_is_reported() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({"error": "out of memory"})) }),
    );
    let url = format!("{}/api/generate", spawn(router).await);

    let err = client(&url).complete("hi").await.unwrap_err();
    assert_eq!(err, "Ollama API error: out of memory");
}

#[tokio::test]
async fn missing_response_field_is_empty() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({"done": true})) }),
    );
    let url = format!("{}/api/generate", spawn(router).await);

    assert_eq!(client(&url).complete("hi").await.unwrap(), "");
}

#[tokio::test]
async fn invalid_json_is_a_parse_error() {
    let router = Router::new().route("/api/generate", post(|| async { "not json" }));
    let url = format!("{}/api/generate", spawn(router).await);

    let err = client(&url).complete("hi").await.unwrap_err();
    assert!(err.starts_with("failed to parse response"), "{err}");
}

#[tokio::test]
async fn connection_refused_is_a_request_failure() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api/generate"))
        .complete("hi")
        .await
        .unwrap_err();
    assert!(err.starts_with("request failed"), "{err}");
}

#[tokio::test]
async fn client_is_a_provider() {
    let (url, _seen) = spawn_fake_ollama().await;
    let ollama = client(&url);
    let provider: &dyn Provider = &ollama;
    assert_eq!(provider.name(), "ollama");
    assert!(provider.generate("x").await.unwrap().contains("Audience"));
}

// ── Pipeline ─────────────────────────────────────────────────────────

#[tokio::test]
async fn pipeline_end_to_end() {
    let (url, seen) = spawn_fake_ollama().await;
    let ollama = client(&url);
    let catalog = FrameworkCatalog::bundled().unwrap();

    let result = enhance(&ollama, &catalog, "Why are customers churning?", 3)
        .await
        .unwrap();

    assert_eq!(result.frameworks, ["CoT", "DEEP", "SCOR"]);
    assert_eq!(seen.lock().unwrap().len(), 3);
    assert!(result.enhanced.starts_with("**CoT**\n- **Role:** a churn analyst"));
    assert!(result.enhanced.contains("\n\n**DEEP**\n"));
    assert!(result.enhanced.contains("\n\n**SCOR**\n"));
    assert_eq!(
        result.unified,
        "Act as a churn analyst. Your audience is the leadership team. \
         Explain why customers leave. Use a calm and factual tone."
    );
    assert!(result.show_unified());
}

#[tokio::test]
async fn pipeline_retries_transient_errors() {
    async fn flaky(State(calls): State<Arc<Mutex<u32>>>) -> Response {
        let mut calls = calls.lock().unwrap();
        *calls += 1;
        if *calls == 1 {
            (StatusCode::SERVICE_UNAVAILABLE, "loading model").into_response()
        } else {
            Json(json!({"response": "- **Role:** a coach"})).into_response()
        }
    }

    let calls = Arc::new(Mutex::new(0u32));
    let router = Router::new()
        .route("/api/generate", post(flaky))
        .with_state(calls.clone());
    let url = format!("{}/api/generate", spawn(router).await);
    let ollama = client(&url);
    let catalog = FrameworkCatalog::bundled().unwrap();
    let retry = RetryConfig {
        initial_delay: std::time::Duration::from_millis(1),
        ..RetryConfig::with_retries(2)
    };

    let result = enhance_with_retry(&ollama, &catalog, "hello", 3, &retry)
        .await
        .unwrap();

    assert_eq!(result.frameworks, ["CRISPE"]);
    assert_eq!(result.enhanced, "**CRISPE**\n- **Role:** a coach");
    assert_eq!(*calls.lock().unwrap(), 2);
    assert!(!result.show_unified());
}
