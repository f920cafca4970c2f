use crate::domain::JobTransitionError;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] JobTransitionError),
}
