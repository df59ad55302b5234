// dag-artifact-core/src/ports/repository.rs

// The versioned-artifact repository: version numbering, LATEST handling and
// backing-resource provisioning all live behind this trait.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::artifact::{Artifact, ArtifactVersion};
use crate::error::DagArtifactError;

/// Options for provisioning the backing bucket / table.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Both `None` means on-demand billing for the metadata table.
    pub dynamodb_write_capacity_units: Option<i64>,
    pub dynamodb_read_capacity_units: Option<i64>,
}

/// Payload of a `put_artifact` call (always targets the LATEST slot).
#[derive(Debug, Clone)]
pub struct PutArtifact {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
    /// Includes the script sha256 under `airflow_dag_script_sha256`.
    pub metadata: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Idempotent: existing resources are left as they are.
    async fn bootstrap(&self, options: &BootstrapOptions) -> Result<(), DagArtifactError>;

    /// Overwrites the LATEST slot.
    async fn put_artifact(&self, request: &PutArtifact) -> Result<Artifact, DagArtifactError>;

    /// Snapshots LATEST as the next immutable version. When LATEST has the
    /// same sha256 as the newest version, that version is returned as is.
    async fn publish_artifact_version(&self, name: &str) -> Result<Artifact, DagArtifactError>;

    async fn get_artifact(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<Artifact, DagArtifactError>;

    async fn get_artifact_content(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<String, DagArtifactError>;

    /// Where `(name, version)` is (or would be) stored. No I/O.
    fn get_artifact_uri(&self, name: &str, version: ArtifactVersion) -> String;

    /// LATEST first, then versions newest to oldest. Empty if unknown.
    async fn list_artifact_versions(&self, name: &str) -> Result<Vec<Artifact>, DagArtifactError>;

    /// Irreversible.
    async fn purge_artifact(&self, name: &str) -> Result<(), DagArtifactError>;

    /// Irreversible.
    async fn purge_all(&self) -> Result<(), DagArtifactError>;
}
