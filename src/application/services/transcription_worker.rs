use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{JobId, SiteDestination};

use super::transcription_pipeline::TranscriptionPipeline;

const FALLBACK_FILE_NAME: &str = "upload";

/// An uploaded recording held in its own temporary directory. The directory is removed
/// when the value is dropped, which happens once the job that owns it finishes.
#[derive(Debug)]
pub struct UploadedMedia {
    path: PathBuf,
    _dir: TempDir,
}

impl UploadedMedia {
    pub fn create(original_name: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("minutes-upload-").tempdir()?;
        let file_name = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME);
        let path = dir.path().join(file_name);
        Ok(Self { path, _dir: dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(FALLBACK_FILE_NAME)
    }
}

pub struct TranscriptionRequest {
    pub job_id: JobId,
    pub destination: Option<SiteDestination>,
    pub upload: UploadedMedia,
}

#[derive(Clone)]
pub struct JobSubmitter {
    sender: mpsc::Sender<TranscriptionRequest>,
    job_repository: Arc<dyn JobRepository>,
}

impl JobSubmitter {
    pub fn new(
        sender: mpsc::Sender<TranscriptionRequest>,
        job_repository: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            sender,
            job_repository,
        }
    }

    /// Registers a new job as processing and queues it for the worker. The job is visible
    /// to status queries as soon as this returns.
    pub async fn submit(
        &self,
        upload: UploadedMedia,
        destination: Option<SiteDestination>,
    ) -> Result<JobId, SubmitError> {
        let job_id = JobId::new();
        self.job_repository.initialize(job_id).await?;

        let request = TranscriptionRequest {
            job_id,
            destination,
            upload,
        };

        if self.sender.send(request).await.is_err() {
            tracing::error!(job_id = %job_id, "Transcription worker channel closed");
            if let Err(e) = self
                .job_repository
                .fail(job_id, "transcription worker unavailable")
                .await
            {
                tracing::error!(error = %e, job_id = %job_id, "Failed to record job failure");
            }
            return Err(SubmitError::WorkerUnavailable);
        }

        tracing::info!(job_id = %job_id, "Transcription job queued");
        Ok(job_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("job repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("transcription worker unavailable")]
    WorkerUnavailable,
}

pub struct TranscriptionWorker {
    receiver: mpsc::Receiver<TranscriptionRequest>,
    pipeline: Arc<TranscriptionPipeline>,
}

impl TranscriptionWorker {
    pub fn new(
        receiver: mpsc::Receiver<TranscriptionRequest>,
        pipeline: Arc<TranscriptionPipeline>,
    ) -> Self {
        Self { receiver, pipeline }
    }

    /// Spawns one task per received request. Jobs never wait on each other; the only
    /// shared limit is the LLM client's request cap.
    pub async fn run(mut self) {
        tracing::info!("Transcription worker started");
        while let Some(request) = self.receiver.recv().await {
            let pipeline = Arc::clone(&self.pipeline);

            let span = tracing::info_span!(
                "transcription_job",
                job_id = %request.job_id,
                filename = %request.upload.file_name(),
            );

            tokio::spawn(
                async move {
                    let TranscriptionRequest {
                        job_id,
                        destination,
                        upload,
                    } = request;

                    match pipeline
                        .process(job_id, destination.as_ref(), upload.path())
                        .await
                    {
                        Ok(()) => {}
                        Err(e) if e.is_client_error() => {
                            tracing::warn!(error = %e, "Transcription job rejected its input");
                        }
                        Err(e) => tracing::error!(error = %e, "Transcription job ended with error"),
                    }
                }
                .instrument(span),
            );
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }
}
