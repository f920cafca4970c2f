use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    JobRepository, MediaConversionError, MediaConverter, RepositoryError, StagingStore,
    StagingStoreError,
};
use crate::domain::{JobId, SiteDestination, StoragePath};

use super::document_delivery_service::DocumentDeliveryService;
use super::summarization_service::{SummarizationError, SummarizationService};
use super::transcription_service::{TranscriptionError, TranscriptionService};

pub struct TranscriptionPipeline {
    job_repository: Arc<dyn JobRepository>,
    media_converter: Arc<dyn MediaConverter>,
    staging_store: Arc<dyn StagingStore>,
    transcription_service: Arc<TranscriptionService>,
    summarization_service: Arc<SummarizationService>,
    document_delivery: Option<Arc<DocumentDeliveryService>>,
}

impl TranscriptionPipeline {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        media_converter: Arc<dyn MediaConverter>,
        staging_store: Arc<dyn StagingStore>,
        transcription_service: Arc<TranscriptionService>,
        summarization_service: Arc<SummarizationService>,
        document_delivery: Option<Arc<DocumentDeliveryService>>,
    ) -> Self {
        Self {
            job_repository,
            media_converter,
            staging_store,
            transcription_service,
            summarization_service,
            document_delivery,
        }
    }

    pub async fn execute(
        &self,
        job_id: JobId,
        destination: Option<&SiteDestination>,
        input_path: &Path,
    ) -> Result<(), PipelineError> {
        self.job_repository.initialize(job_id).await?;
        self.process(job_id, destination, input_path).await
    }

    /// Runs the pipeline for a job that is already initialized. Any stage error is recorded
    /// on the job exactly once and then returned to the caller.
    pub async fn process(
        &self,
        job_id: JobId,
        destination: Option<&SiteDestination>,
        input_path: &Path,
    ) -> Result<(), PipelineError> {
        let mut staged = None;
        let result = self.run_stages(job_id, input_path, &mut staged).await;

        match result {
            Ok(()) => {
                self.discard_staged(staged.as_ref()).await;
                tracing::info!("Transcription job completed");

                if let Some(destination) = destination {
                    self.deliver_document(job_id, destination).await;
                }
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                tracing::error!(error = %error_msg, "Transcription job failed");
                if let Err(repo_err) = self.job_repository.fail(job_id, &error_msg).await {
                    tracing::error!(error = %repo_err, "Failed to record job failure");
                }
                self.discard_staged(staged.as_ref()).await;
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        job_id: JobId,
        input_path: &Path,
        staged: &mut Option<StoragePath>,
    ) -> Result<(), PipelineError> {
        tracing::debug!(input = %input_path.display(), "Converting media");
        let audio = self.media_converter.convert(input_path).await?;

        let storage_path = StoragePath::new(&job_id, &audio.file_name);
        tracing::debug!(path = %storage_path, bytes = audio.data.len(), "Uploading audio");
        let audio_url = self.staging_store.upload(&storage_path, audio.data).await?;
        *staged = Some(storage_path);

        tracing::debug!("Transcribing audio");
        let transcribed_text = self.transcription_service.transcribe(&audio_url).await?;

        tracing::debug!("Summarizing transcript");
        let summarized_text = self
            .summarization_service
            .summarize(&transcribed_text)
            .await?;

        self.job_repository
            .complete(job_id, transcribed_text, summarized_text)
            .await?;

        Ok(())
    }

    async fn discard_staged(&self, staged: Option<&StoragePath>) {
        let Some(path) = staged else {
            return;
        };
        if let Err(e) = self.staging_store.delete(path).await {
            tracing::warn!(error = %e, path = %path, "Failed to delete staged audio");
        }
    }

    async fn deliver_document(&self, job_id: JobId, destination: &SiteDestination) {
        let Some(delivery) = &self.document_delivery else {
            tracing::warn!("Document delivery requested but no document service is configured");
            return;
        };

        let job = match self.job_repository.get_by_id(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                tracing::warn!("Completed job disappeared before document delivery");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load job for document delivery");
                return;
            }
        };

        let (Some(transcribed_text), Some(summarized_text)) =
            (job.transcribed_text.as_deref(), job.summarized_text.as_deref())
        else {
            tracing::warn!("Completed job has no text to deliver");
            return;
        };

        if let Err(e) = delivery
            .deliver(destination, transcribed_text, summarized_text)
            .await
        {
            tracing::warn!(
                error = %e,
                "Document delivery failed; transcription result is unaffected"
            );
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("media conversion: {0}")]
    Conversion(#[from] MediaConversionError),
    #[error("blob storage: {0}")]
    Staging(#[from] StagingStoreError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
    #[error("job repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl PipelineError {
    /// True when the job failed because of what the caller uploaded rather than a service fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Conversion(MediaConversionError::UnsupportedFormat(_))
        )
    }
}
