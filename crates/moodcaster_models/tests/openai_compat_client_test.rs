use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use chrono::Weekday;
use moodcaster_core::{CastPrompt, Category, GenerationRequest, Mood, SamplingProfile};
use moodcaster_models::{ChatBackend, OpenAICompatibleClient, UpstreamError, UpstreamReply};
use serde_json::{Value, json};
use std::time::Duration;

async fn json_reply() -> impl IntoResponse {
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": "  Slow coffee, clear head. ☕  "}}]
    }))
}

async fn sse_reply() -> impl IntoResponse {
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Shipping \"}}]}\n\n",
        "data: {broken\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"small wins.\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    ([(header::CONTENT_TYPE, "text/event-stream")], body)
}

async fn slow_reply() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    json_reply().await
}

async fn unavailable() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "overloaded")
}

async fn html_reply() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "<html></html>")
}

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let content = format!(
        "auth={} model={} stream={} temperature={} messages={}",
        auth,
        body["model"].as_str().unwrap_or_default(),
        body.get("stream").is_some(),
        body["temperature"],
        body["messages"].as_array().map(Vec::len).unwrap_or_default(),
    );
    Json(json!({"choices": [{"message": {"content": content}}]}))
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/json", post(json_reply))
        .route("/sse", post(sse_reply))
        .route("/slow", post(slow_reply))
        .route("/unavailable", post(unavailable))
        .route("/html", post(html_reply))
        .route("/echo", post(echo));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str, path: &str, timeout: Duration) -> OpenAICompatibleClient {
    OpenAICompatibleClient::new(
        "test-key".to_string(),
        "test-model".to_string(),
        format!("{}{}", base, path),
        "stub",
        timeout,
    )
}

fn prompt(diverse: bool) -> (CastPrompt, SamplingProfile) {
    let req = GenerationRequest::new(Mood::Calm, Category::GoodMorning, diverse);
    (
        CastPrompt::build(&req, None, Weekday::Mon),
        SamplingProfile::for_request(&req),
    )
}

#[tokio::test]
async fn test_json_completion_text() {
    let base = spawn_stub().await;
    let (prompt, sampling) = prompt(false);

    let reply = client(&base, "/json", Duration::from_secs(5))
        .generate(&prompt, &sampling)
        .await
        .expect("stub answers");

    assert!(matches!(reply, UpstreamReply::Json(_)));
    assert_eq!(reply.text(), "Slow coffee, clear head. ☕");
}

#[tokio::test]
async fn test_streamed_completion_skips_malformed_frames() {
    let base = spawn_stub().await;
    let (prompt, sampling) = prompt(false);

    let reply = client(&base, "/sse", Duration::from_secs(5))
        .with_streaming(true)
        .generate(&prompt, &sampling)
        .await
        .expect("stub streams");

    assert!(matches!(reply, UpstreamReply::Stream(_)));
    assert_eq!(reply.text(), "Shipping small wins.");
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let base = spawn_stub().await;
    let (prompt, sampling) = prompt(false);

    let err = client(&base, "/slow", Duration::from_millis(200))
        .generate(&prompt, &sampling)
        .await
        .unwrap_err();

    assert_eq!(err, UpstreamError::Timeout(200));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let base = spawn_stub().await;
    let (prompt, sampling) = prompt(false);

    let err = client(&base, "/unavailable", Duration::from_secs(5))
        .generate(&prompt, &sampling)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UpstreamError::Api {
            status: 503,
            message: "overloaded".to_string()
        }
    );
}

#[tokio::test]
async fn test_unsupported_content_type_is_rejected() {
    let base = spawn_stub().await;
    let (prompt, sampling) = prompt(false);

    let err = client(&base, "/html", Duration::from_secs(5))
        .generate(&prompt, &sampling)
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::UnsupportedContentType(_)));
}

#[tokio::test]
async fn test_request_carries_auth_model_and_profile() {
    let base = spawn_stub().await;
    let (prompt, sampling) = prompt(true);

    let reply = client(&base, "/echo", Duration::from_secs(5))
        .generate(&prompt, &sampling)
        .await
        .expect("stub echoes");

    let text = reply.text();
    assert!(text.contains("auth=Bearer test-key"), "{}", text);
    assert!(text.contains("model=test-model"), "{}", text);
    assert!(text.contains("stream=false"), "{}", text);
    assert!(text.contains("temperature=0.9"), "{}", text);
    assert!(text.contains("messages=2"), "{}", text);
}

#[tokio::test]
async fn test_unreachable_upstream_is_http_error() {
    let (prompt, sampling) = prompt(false);

    let err = client("http://127.0.0.1:1", "/json", Duration::from_secs(5))
        .generate(&prompt, &sampling)
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Http(_)));
}
