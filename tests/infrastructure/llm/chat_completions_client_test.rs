use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::{Value, json};

use minutes::application::ports::{LlmClient, LlmClientError};
use minutes::domain::ChatMessage;
use minutes::infrastructure::llm::create_llm_client;
use minutes::presentation::config::{LlmProviderSetting, LlmSettings};

use crate::helpers::start_mock_server;

fn settings(provider: LlmProviderSetting, endpoint: Option<String>) -> LlmSettings {
    LlmSettings {
        provider,
        endpoint,
        api_key: "llm-key".to_string(),
        chat_model: "gpt-4o".to_string(),
        api_version: "2024-06-01".to_string(),
        max_tokens: 256,
        temperature: 0.2,
        max_concurrent_requests: 2,
    }
}

fn completion(content: &str) -> Json<Value> {
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn azure_completion(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let key = headers.get("api-key").and_then(|v| v.to_str().ok());
    if key != Some("llm-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    if query.get("api-version").map(String::as_str) != Some("2024-06-01") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "api-version"})));
    }
    let roles: Vec<&str> = body["messages"]
        .as_array()
        .map(|messages| messages.iter().filter_map(|m| m["role"].as_str()).collect())
        .unwrap_or_default();
    let reply = format!("roles={}", roles.join(","));
    (StatusCode::OK, completion(&reply))
}

async fn openai_completion(headers: HeaderMap) -> impl IntoResponse {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    if auth != Some("Bearer llm-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    (StatusCode::OK, completion("openai reply"))
}

fn mock_app() -> Router {
    Router::new()
        .route(
            "/openai/deployments/gpt-4o/chat/completions",
            post(azure_completion),
        )
        .route("/v1/chat/completions", post(openai_completion))
        .route(
            "/limited/openai/deployments/gpt-4o/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        )
        .route(
            "/broken/openai/deployments/gpt-4o/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/empty/openai/deployments/gpt-4o/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        )
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You summarize meetings."),
        ChatMessage::user("Summarize this."),
    ]
}

#[tokio::test]
async fn given_azure_provider_when_completing_then_uses_deployment_url_and_api_key() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;
    let client = create_llm_client(&settings(LlmProviderSetting::Azure, Some(base_url.clone())))
        .unwrap();

    let reply = client.complete(&messages()).await.unwrap();

    assert_eq!(reply, "roles=system,user");
    assert_eq!(
        client.url(),
        format!(
            "{}/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01",
            base_url
        )
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_openai_provider_when_completing_then_uses_bearer_auth() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;
    let endpoint = format!("{}/v1/", base_url);
    let client = create_llm_client(&settings(LlmProviderSetting::OpenAi, Some(endpoint))).unwrap();

    let reply = client.complete(&messages()).await.unwrap();

    assert_eq!(reply, "openai reply");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_too_many_requests_when_completing_then_returns_rate_limited() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;
    let endpoint = format!("{}/limited", base_url);
    let client = create_llm_client(&settings(LlmProviderSetting::Azure, Some(endpoint))).unwrap();

    let result = client.complete(&messages()).await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_completing_then_reports_status_and_body() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;
    let endpoint = format!("{}/broken", base_url);
    let client = create_llm_client(&settings(LlmProviderSetting::Azure, Some(endpoint))).unwrap();

    let error = client.complete(&messages()).await.unwrap_err();

    match error {
        LlmClientError::ApiRequestFailed(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_choices_when_completing_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;
    let endpoint = format!("{}/empty", base_url);
    let client = create_llm_client(&settings(LlmProviderSetting::Azure, Some(endpoint))).unwrap();

    let result = client.complete(&messages()).await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[test]
fn given_azure_provider_without_endpoint_when_creating_client_then_returns_configuration_error() {
    let result = create_llm_client(&settings(LlmProviderSetting::Azure, None));

    assert!(matches!(result, Err(LlmClientError::Configuration(_))));
}

#[test]
fn given_openai_provider_without_endpoint_when_creating_client_then_uses_public_api() {
    let client = create_llm_client(&settings(LlmProviderSetting::OpenAi, None)).unwrap();

    assert_eq!(client.url(), "https://api.openai.com/v1/chat/completions");
}

#[derive(Clone, Default)]
struct InFlight {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

async fn slow_completion(State(in_flight): State<InFlight>) -> Json<Value> {
    let now = in_flight.current.fetch_add(1, Ordering::SeqCst) + 1;
    in_flight.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    in_flight.current.fetch_sub(1, Ordering::SeqCst);
    completion("done")
}

#[tokio::test]
async fn given_more_calls_than_request_cap_when_completing_concurrently_then_caps_in_flight_requests()
{
    let in_flight = InFlight::default();
    let app = Router::new()
        .route("/slow/chat/completions", post(slow_completion))
        .with_state(in_flight.clone());
    let (base_url, shutdown_tx) = start_mock_server(app).await;
    let endpoint = format!("{}/slow", base_url);
    let client = Arc::new(
        create_llm_client(&settings(LlmProviderSetting::OpenAi, Some(endpoint))).unwrap(),
    );

    let conversation = messages();
    let calls = (0..6).map(|_| client.complete(&conversation));
    let replies = futures::future::join_all(calls).await;

    assert!(replies.iter().all(|reply| matches!(reply, Ok(text) if text == "done")));
    let peak = in_flight.peak.load(Ordering::SeqCst);
    assert!((1..=2).contains(&peak), "peak in-flight requests was {}", peak);
    shutdown_tx.send(()).ok();
}
