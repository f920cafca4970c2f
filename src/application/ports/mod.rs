mod document_delivery;
mod document_renderer;
mod job_repository;
mod llm_client;
mod media_converter;
mod repository_error;
mod speech_service;
mod staging_store;

pub use document_delivery::{
    DocumentDelivery, DocumentDeliveryError, FolderSummary, ROOT_FOLDER_ID, SiteSummary,
};
pub use document_renderer::{DocumentRenderError, DocumentRenderer, GeneratedDocument};
pub use job_repository::JobRepository;
pub use llm_client::{LlmClient, LlmClientError};
pub use media_converter::{MediaConversionError, MediaConverter};
pub use repository_error::RepositoryError;
pub use speech_service::{
    SpeechService, SpeechServiceError, TranscriptionResultFile, TranscriptionStatusReport,
};
pub use staging_store::{StagingStore, StagingStoreError};
