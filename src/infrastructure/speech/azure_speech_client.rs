use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    SpeechService, SpeechServiceError, TranscriptionResultFile, TranscriptionStatusReport,
};
use crate::domain::{RecognizedPhrase, TranscriptContent, TranscriptionJobStatus};

const API_PATH: &str = "speechtotext/v3.2/transcriptions";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Azure AI Speech batch transcription over REST.
pub struct AzureSpeechClient {
    client: Client,
    endpoint: String,
    api_key: String,
    locale: String,
    diarization: bool,
}

impl AzureSpeechClient {
    pub fn new(endpoint: &str, api_key: &str, locale: &str, diarization: bool) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            locale: locale.to_string(),
            diarization,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header("Accept", "application/json")
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SpeechServiceError> {
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| SpeechServiceError::ApiRequestFailed(e.to_string()))?;

        parse_json(response).await
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, SpeechServiceError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(SpeechServiceError::UnexpectedStatus { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| SpeechServiceError::InvalidResponse(e.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTranscriptionRequest<'a> {
    display_name: &'a str,
    locale: &'a str,
    content_urls: Vec<&'a str>,
    properties: TranscriptionProperties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptionProperties {
    diarization_enabled: bool,
    punctuation_mode: &'static str,
    word_level_timestamps_enabled: bool,
}

#[derive(Deserialize)]
struct CreateTranscriptionResponse {
    #[serde(rename = "self")]
    self_url: String,
}

#[derive(Deserialize)]
struct TranscriptionStatusResponse {
    status: String,
    #[serde(default)]
    links: Option<TranscriptionLinks>,
}

#[derive(Deserialize)]
struct TranscriptionLinks {
    files: Option<String>,
}

#[derive(Deserialize)]
struct FilesResponse {
    #[serde(default)]
    values: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    kind: Option<String>,
    links: FileLinks,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileLinks {
    content_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentResponse {
    #[serde(default)]
    combined_recognized_phrases: Vec<CombinedPhrase>,
    #[serde(default)]
    recognized_phrases: Vec<PhraseEntry>,
}

#[derive(Deserialize)]
struct CombinedPhrase {
    display: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhraseEntry {
    speaker: Option<u32>,
    #[serde(default)]
    n_best: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    display: String,
}

impl From<ContentResponse> for TranscriptContent {
    fn from(response: ContentResponse) -> Self {
        Self {
            combined: response
                .combined_recognized_phrases
                .into_iter()
                .map(|phrase| phrase.display)
                .collect(),
            phrases: response
                .recognized_phrases
                .into_iter()
                .filter_map(|phrase| {
                    let speaker = phrase.speaker;
                    phrase
                        .n_best
                        .into_iter()
                        .next()
                        .map(|best| RecognizedPhrase::new(speaker, best.display))
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SpeechService for AzureSpeechClient {
    async fn submit_job(&self, audio_url: &str) -> Result<String, SpeechServiceError> {
        let body = CreateTranscriptionRequest {
            display_name: "Transcription",
            locale: &self.locale,
            content_urls: vec![audio_url],
            properties: TranscriptionProperties {
                diarization_enabled: self.diarization,
                punctuation_mode: "DictatedAndAutomatic",
                word_level_timestamps_enabled: true,
            },
        };

        let url = format!("{}/{}", self.endpoint, API_PATH);
        tracing::debug!(url = %url, "Creating batch transcription job");

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechServiceError::ApiRequestFailed(e.to_string()))?;

        let created: CreateTranscriptionResponse = parse_json(response).await?;
        tracing::info!(job_url = %created.self_url, "Batch transcription job created");
        Ok(created.self_url)
    }

    async fn get_status(
        &self,
        job_url: &str,
    ) -> Result<TranscriptionStatusReport, SpeechServiceError> {
        let response: TranscriptionStatusResponse = self.get_json(job_url).await?;
        let status = response
            .status
            .parse::<TranscriptionJobStatus>()
            .map_err(SpeechServiceError::InvalidResponse)?;

        Ok(TranscriptionStatusReport {
            status,
            files_url: response.links.and_then(|links| links.files),
        })
    }

    async fn get_result_files(
        &self,
        files_url: &str,
    ) -> Result<Vec<TranscriptionResultFile>, SpeechServiceError> {
        let response: FilesResponse = self.get_json(files_url).await?;
        Ok(response
            .values
            .into_iter()
            .map(|entry| TranscriptionResultFile {
                kind: entry.kind,
                content_url: entry.links.content_url,
            })
            .collect())
    }

    async fn get_content(&self, content_url: &str) -> Result<TranscriptContent, SpeechServiceError> {
        let response: ContentResponse = self.get_json(content_url).await?;
        Ok(response.into())
    }
}
