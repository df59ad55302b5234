// dag-artifact-core/src/application/inspect.rs

use crate::domain::artifact::{Artifact, ArtifactVersion};
use crate::domain::dag::DagId;
use crate::error::DagArtifactError;
use crate::ports::ArtifactRepository;

/// Every stored artifact of a DAG: LATEST first, then newest to oldest.
pub async fn list_dag_versions(
    repo: &dyn ArtifactRepository,
    dag_id: &DagId,
) -> Result<Vec<Artifact>, DagArtifactError> {
    repo.list_artifact_versions(dag_id.as_str()).await
}

pub async fn get_dag_artifact(
    repo: &dyn ArtifactRepository,
    dag_id: &DagId,
    version: ArtifactVersion,
) -> Result<Artifact, DagArtifactError> {
    repo.get_artifact(dag_id.as_str(), version).await
}
