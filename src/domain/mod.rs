mod chat_message;
mod job;
mod job_id;
mod job_status;
mod media;
mod site_destination;
mod storage_path;
mod text_chunk;
mod transcript;

pub use chat_message::{ChatMessage, MessageRole};
pub use job::{Job, JobTransitionError};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use media::{ConvertedAudio, MediaKind};
pub use site_destination::SiteDestination;
pub use storage_path::StoragePath;
pub use text_chunk::TextChunk;
pub use transcript::{
    RecognizedPhrase, TranscriptContent, TranscriptRendering, TranscriptionJobStatus,
    render_by_speaker,
};
