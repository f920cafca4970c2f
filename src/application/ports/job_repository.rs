use async_trait::async_trait;

use crate::domain::{Job, JobId};

use super::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn initialize(&self, id: JobId) -> Result<(), RepositoryError>;

    async fn complete(
        &self,
        id: JobId,
        transcribed_text: String,
        summarized_text: String,
    ) -> Result<(), RepositoryError>;

    async fn fail(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
}
