use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};

use minutes::application::ports::{SpeechService, SpeechServiceError};
use minutes::domain::{RecognizedPhrase, TranscriptionJobStatus};
use minutes::infrastructure::speech::AzureSpeechClient;

use crate::helpers::start_mock_server;

const API_KEY: &str = "speech-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("Ocp-Apim-Subscription-Key")
        .and_then(|v| v.to_str().ok())
        == Some(API_KEY)
}

async fn create_transcription(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
    }
    let valid = body["contentUrls"][0] == "https://blob.test/job/meeting.wav"
        && body["locale"] == "ja-JP"
        && body["properties"]["diarizationEnabled"] == true
        && body["properties"]["punctuationMode"] == "DictatedAndAutomatic";
    if !valid {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad body"})));
    }
    (
        StatusCode::CREATED,
        Json(json!({"self": "https://speech.test/speechtotext/v3.2/transcriptions/abc"})),
    )
}

fn mock_app() -> Router {
    Router::new()
        .route("/speechtotext/v3.2/transcriptions", post(create_transcription))
        .route(
            "/jobs/running",
            get(|| async { Json(json!({"status": "Running", "links": {}})) }),
        )
        .route(
            "/jobs/done",
            get(|| async {
                Json(json!({
                    "status": "Succeeded",
                    "links": {"files": "https://speech.test/jobs/done/files"}
                }))
            }),
        )
        .route(
            "/jobs/odd",
            get(|| async { Json(json!({"status": "Paused"})) }),
        )
        .route(
            "/files",
            get(|| async {
                Json(json!({
                    "values": [
                        {"kind": "TranscriptionReport", "links": {"contentUrl": "https://r"}},
                        {"kind": "Transcription", "links": {"contentUrl": "https://t"}}
                    ]
                }))
            }),
        )
        .route(
            "/content",
            get(|| async {
                Json(json!({
                    "combinedRecognizedPhrases": [{"channel": 0, "display": "こんにちは。よろしく。"}],
                    "recognizedPhrases": [
                        {"speaker": 1, "nBest": [{"display": "こんにちは。"}, {"display": "今日は"}]},
                        {"speaker": 2, "nBest": [{"display": "よろしく。"}]},
                        {"nBest": []}
                    ]
                }))
            }),
        )
}

fn client(base_url: &str, key: &str) -> AzureSpeechClient {
    AzureSpeechClient::new(base_url, key, "ja-JP", true)
}

#[tokio::test]
async fn given_audio_url_when_submitting_job_then_returns_self_link() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;

    let job_url = client(&base_url, API_KEY)
        .submit_job("https://blob.test/job/meeting.wav")
        .await
        .unwrap();

    assert_eq!(job_url, "https://speech.test/speechtotext/v3.2/transcriptions/abc");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_wrong_key_when_submitting_job_then_returns_unexpected_status() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;

    let result = client(&base_url, "wrong")
        .submit_job("https://blob.test/job/meeting.wav")
        .await;

    assert!(matches!(
        result,
        Err(SpeechServiceError::UnexpectedStatus { status: 401, .. })
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_running_and_finished_jobs_when_querying_status_then_maps_status_and_files_link() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;
    let client = client(&base_url, API_KEY);

    let running = client
        .get_status(&format!("{}/jobs/running", base_url))
        .await
        .unwrap();
    let done = client
        .get_status(&format!("{}/jobs/done", base_url))
        .await
        .unwrap();

    assert_eq!(running.status, TranscriptionJobStatus::Running);
    assert_eq!(running.files_url, None);
    assert_eq!(done.status, TranscriptionJobStatus::Succeeded);
    assert_eq!(
        done.files_url.as_deref(),
        Some("https://speech.test/jobs/done/files")
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unknown_status_when_querying_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;

    let result = client(&base_url, API_KEY)
        .get_status(&format!("{}/jobs/odd", base_url))
        .await;

    assert!(matches!(result, Err(SpeechServiceError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_files_listing_when_fetching_then_keeps_kind_and_content_url() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;

    let files = client(&base_url, API_KEY)
        .get_result_files(&format!("{}/files", base_url))
        .await
        .unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[1].kind.as_deref(), Some("Transcription"));
    assert_eq!(files[1].content_url, "https://t");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_content_payload_when_fetching_then_uses_best_candidate_per_phrase() {
    let (base_url, shutdown_tx) = start_mock_server(mock_app()).await;

    let content = client(&base_url, API_KEY)
        .get_content(&format!("{}/content", base_url))
        .await
        .unwrap();

    assert_eq!(content.combined, vec!["こんにちは。よろしく。".to_string()]);
    assert_eq!(
        content.phrases,
        vec![
            RecognizedPhrase::new(Some(1), "こんにちは。"),
            RecognizedPhrase::new(Some(2), "よろしく。"),
        ]
    );
    shutdown_tx.send(()).ok();
}
