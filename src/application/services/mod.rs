mod document_delivery_service;
mod summarization_service;
mod summary_prompt;
mod token_chunker;
mod transcription_pipeline;
mod transcription_service;
mod transcription_worker;

pub use document_delivery_service::{DeliveryError, DocumentDeliveryService};
pub use summarization_service::{SummarizationConfig, SummarizationError, SummarizationService};
pub use summary_prompt::build_summary_prompt;
pub use token_chunker::{ChunkingError, count_tokens, split_by_tokens};
pub use transcription_pipeline::{PipelineError, TranscriptionPipeline};
pub use transcription_service::{PollPolicy, TranscriptionError, TranscriptionService};
pub use transcription_worker::{
    JobSubmitter, SubmitError, TranscriptionRequest, TranscriptionWorker, UploadedMedia,
};
