// dag-artifact-core/src/ports/mod.rs

pub mod dag_folder;
pub mod repository;

pub use dag_folder::DagFolder;
pub use repository::{ArtifactRepository, BootstrapOptions, PutArtifact};
