use std::sync::Arc;

use crate::application::ports::{DocumentDelivery, JobRepository};
use crate::application::services::JobSubmitter;

#[derive(Clone)]
pub struct AppState {
    pub job_repository: Arc<dyn JobRepository>,
    pub job_submitter: JobSubmitter,
    /// Absent when SharePoint is not configured.
    pub document_delivery: Option<Arc<dyn DocumentDelivery>>,
    pub max_upload_bytes: usize,
}
