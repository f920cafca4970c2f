use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::{SpeechService, SpeechServiceError};
use crate::domain::{TranscriptRendering, TranscriptionJobStatus};

const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);
const TRANSCRIPTION_KIND: &str = "Transcription";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct TranscriptionService {
    speech_service: Arc<dyn SpeechService>,
    poll_policy: PollPolicy,
    rendering: TranscriptRendering,
}

impl TranscriptionService {
    pub fn new(
        speech_service: Arc<dyn SpeechService>,
        poll_policy: PollPolicy,
        rendering: TranscriptRendering,
    ) -> Self {
        Self {
            speech_service,
            poll_policy,
            rendering,
        }
    }

    pub async fn transcribe(&self, audio_url: &str) -> Result<String, TranscriptionError> {
        let job_url = self.submit(audio_url).await?;
        let files_url = self.poll(&job_url).await?;
        let content_url = self.fetch_result(&files_url).await?;
        let text = self.render(&content_url).await?;

        tracing::info!(chars = text.len(), "Transcription completed");
        Ok(text)
    }

    pub async fn submit(&self, audio_url: &str) -> Result<String, TranscriptionError> {
        let job_url = self.speech_service.submit_job(audio_url).await?;
        tracing::debug!(job_url = %job_url, "Transcription job submitted");
        Ok(job_url)
    }

    /// Polls until the job is terminal. The interval doubles after each query up to
    /// `max_interval`; the total wait never exceeds `timeout`.
    pub async fn poll(&self, job_url: &str) -> Result<String, TranscriptionError> {
        let started = Instant::now();
        let deadline = started + self.poll_policy.timeout;
        let mut interval = self.poll_policy.initial_interval;

        loop {
            let report = self.speech_service.get_status(job_url).await?;

            match report.status {
                TranscriptionJobStatus::Succeeded => {
                    return report.files_url.ok_or_else(|| {
                        TranscriptionError::Failed("succeeded job has no files link".to_string())
                    });
                }
                TranscriptionJobStatus::Failed | TranscriptionJobStatus::Cancelled => {
                    return Err(TranscriptionError::JobEnded(report.status));
                }
                TranscriptionJobStatus::NotStarted | TranscriptionJobStatus::Running => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(TranscriptionError::Timeout(self.poll_policy.timeout));
            }

            tracing::debug!(
                status = %report.status,
                elapsed_secs = started.elapsed().as_secs(),
                next_poll_ms = interval.as_millis() as u64,
                "Transcription still in progress"
            );
            tokio::time::sleep(interval.min(deadline.saturating_duration_since(now))).await;
            interval = (interval * 2).min(self.poll_policy.max_interval);
        }
    }

    pub async fn fetch_result(&self, files_url: &str) -> Result<String, TranscriptionError> {
        let files = self.speech_service.get_result_files(files_url).await?;

        files
            .iter()
            .find(|file| file.kind.as_deref() == Some(TRANSCRIPTION_KIND))
            .or_else(|| files.first())
            .map(|file| file.content_url.clone())
            .ok_or_else(|| {
                TranscriptionError::Failed("transcription produced no result files".to_string())
            })
    }

    pub async fn render(&self, content_url: &str) -> Result<String, TranscriptionError> {
        let content = self.speech_service.get_content(content_url).await?;
        Ok(content.render(self.rendering))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription failed: {0}")]
    Failed(String),
    #[error("transcription job ended with status {0}")]
    JobEnded(TranscriptionJobStatus),
    #[error("transcription timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<SpeechServiceError> for TranscriptionError {
    fn from(err: SpeechServiceError) -> Self {
        TranscriptionError::Failed(err.to_string())
    }
}
