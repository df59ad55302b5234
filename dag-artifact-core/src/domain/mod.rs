pub mod artifact;
pub mod dag;
pub mod error;
pub mod project;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use artifact::{Artifact, ArtifactVersion};
pub use dag::{DagAlias, DagId};
pub use error::DomainError;
