use async_trait::async_trait;

use crate::domain::{TranscriptContent, TranscriptionJobStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionStatusReport {
    pub status: TranscriptionJobStatus,
    pub files_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResultFile {
    pub kind: Option<String>,
    pub content_url: String,
}

#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Creates a batch transcription job for the audio at `audio_url`, returning the job URL.
    async fn submit_job(&self, audio_url: &str) -> Result<String, SpeechServiceError>;

    async fn get_status(&self, job_url: &str)
    -> Result<TranscriptionStatusReport, SpeechServiceError>;

    async fn get_result_files(
        &self,
        files_url: &str,
    ) -> Result<Vec<TranscriptionResultFile>, SpeechServiceError>;

    async fn get_content(&self, content_url: &str) -> Result<TranscriptContent, SpeechServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
