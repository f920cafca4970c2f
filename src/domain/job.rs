use chrono::{DateTime, Utc};

use super::{JobId, JobStatus};

const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub transcribed_text: Option<String>,
    pub summarized_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("job cannot move from {from} to {to}")]
pub struct JobTransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Processing,
            transcribed_text: None,
            summarized_text: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn complete(
        &mut self,
        transcribed_text: String,
        summarized_text: String,
    ) -> Result<(), JobTransitionError> {
        self.ensure_processing(JobStatus::Completed)?;
        self.status = JobStatus::Completed;
        self.transcribed_text = Some(transcribed_text);
        self.summarized_text = Some(summarized_text);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Both text fields carry the same error text once a job has failed.
    pub fn fail(&mut self, error_message: &str) -> Result<(), JobTransitionError> {
        self.ensure_processing(JobStatus::Failed)?;
        let error_text = Self::error_text(error_message);
        self.status = JobStatus::Failed;
        self.transcribed_text = Some(error_text.clone());
        self.summarized_text = Some(error_text);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn error_text(error_message: &str) -> String {
        format!("{}{}", ERROR_PREFIX, error_message)
    }

    fn ensure_processing(&self, to: JobStatus) -> Result<(), JobTransitionError> {
        if self.status.is_terminal() {
            return Err(JobTransitionError {
                from: self.status,
                to,
            });
        }
        Ok(())
    }
}
