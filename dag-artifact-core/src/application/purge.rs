// dag-artifact-core/src/application/purge.rs

// Irreversible. Deployment files already in the DAG folder are left alone.

use tracing::{info, instrument};

use crate::domain::dag::DagId;
use crate::error::DagArtifactError;
use crate::ports::ArtifactRepository;

#[instrument(skip(repo), fields(dag_id = %dag_id))]
pub async fn purge_dag(repo: &dyn ArtifactRepository, dag_id: &DagId) -> Result<(), DagArtifactError> {
    repo.purge_artifact(dag_id.as_str()).await?;
    info!("🗑️  DAG artifacts purged");
    Ok(())
}

#[instrument(skip(repo))]
pub async fn purge_all_dag(repo: &dyn ArtifactRepository) -> Result<(), DagArtifactError> {
    repo.purge_all().await?;
    info!("🗑️  All DAG artifacts purged");
    Ok(())
}
