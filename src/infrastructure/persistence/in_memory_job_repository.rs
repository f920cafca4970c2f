use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId};

/// Process-local job table. Records live until the process exits.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: DashMap<JobId, Job>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: JobId, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Job) -> Result<(), RepositoryError>,
    {
        let mut job = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        apply(job.value_mut())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    #[instrument(skip(self), fields(job_id = %id))]
    async fn initialize(&self, id: JobId) -> Result<(), RepositoryError> {
        match self.jobs.entry(id) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Job::new(id));
                Ok(())
            }
        }
    }

    #[instrument(skip(self, transcribed_text, summarized_text), fields(job_id = %id))]
    async fn complete(
        &self,
        id: JobId,
        transcribed_text: String,
        summarized_text: String,
    ) -> Result<(), RepositoryError> {
        self.update(id, |job| {
            job.complete(transcribed_text, summarized_text)?;
            Ok(())
        })
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn fail(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError> {
        self.update(id, |job| {
            job.fail(error_message)?;
            Ok(())
        })
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.get(&id).map(|job| job.value().clone()))
    }
}
