mod error_response;
mod health;
mod job_status;
mod sites;
mod transcriptions;

pub use error_response::ErrorResponse;
pub use health::health_handler;
pub use job_status::{JobStatusResponse, job_status_handler};
pub use sites::{list_folders_handler, list_sites_handler};
pub use transcriptions::{TranscriptionAcceptedResponse, submit_transcription_handler};
