use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Caller-visible failures of the shelter domain.
///
/// The payload string is the human-readable message surfaced to API callers.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    AnimalNotFound(String),

    #[error("Animal already exists: {0}")]
    AnimalAlreadyExists(String),

    #[error("{0}")]
    PhotoNotFound(String),

    #[error("{0}")]
    MedicalRecordNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] anyhow::Error),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::AnimalNotFound(_)
                | DomainError::PhotoNotFound(_)
                | DomainError::MedicalRecordNotFound(_)
        )
    }
}
