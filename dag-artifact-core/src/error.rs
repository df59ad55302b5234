// dag-artifact-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagArtifactError {
    // --- ERREURS DU DOMAINE (dag_id literal, versions) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (S3, DynamoDB, IO, Config) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl DagArtifactError {
    /// True when the repository reported that the artifact does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DagArtifactError::Domain(DomainError::ArtifactNotFound { .. })
                | DagArtifactError::Infrastructure(InfrastructureError::Storage(
                    StorageError::NotFound { .. }
                ))
        )
    }
}

// Manual implementations to avoid duplicate enum variants but keep ergonomics
impl From<std::io::Error> for DagArtifactError {
    fn from(err: std::io::Error) -> Self {
        DagArtifactError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<StorageError> for DagArtifactError {
    fn from(err: StorageError) -> Self {
        DagArtifactError::Infrastructure(InfrastructureError::Storage(err))
    }
}

impl From<serde_json::Error> for DagArtifactError {
    fn from(err: serde_json::Error) -> Self {
        DagArtifactError::Infrastructure(InfrastructureError::JsonError(err))
    }
}
