// dag-artifact-core/src/application/publish.rs

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::artifact::{Artifact, ArtifactVersion};
use crate::domain::dag::{DagAlias, DagId, DagScript, deployment_file};
use crate::error::DagArtifactError;
use crate::ports::{ArtifactRepository, DagFolder, PutArtifact};

const ARTIFACT_CONTENT_TYPE: &str = "text/plain";

/// Outcome of a publish / release / deploy.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedDag {
    pub artifact: Artifact,
    /// `<dag_id>_latest` or `<dag_id>_v<n>`
    pub deployed_dag_id: String,
    /// Where the deployment file landed (path or `s3://` URI).
    pub location: String,
}

/// Uploads a DAG script to the LATEST slot and deploys it as `<dag_id>_latest`.
///
/// The artifact is stored before the rewrite: a script without the
/// `dag_id = "<dag_id>"` literal ends up persisted but not deployed.
#[instrument(skip(repo, dags, metadata, tags), fields(dag_id = %dag_id))]
pub async fn publish_dag(
    repo: &dyn ArtifactRepository,
    dags: &dyn DagFolder,
    dag_id: &DagId,
    script_path: &Path,
    metadata: &BTreeMap<String, String>,
    tags: &BTreeMap<String, String>,
) -> Result<PublishedDag, DagArtifactError> {
    let script = DagScript::from_bytes(tokio::fs::read(script_path).await?);
    info!(path = ?script_path, sha256 = %script.sha256, "Publishing DAG script");

    let request = PutArtifact {
        name: dag_id.as_str().to_string(),
        metadata: script.metadata(metadata),
        content: script.content,
        content_type: ARTIFACT_CONTENT_TYPE.to_string(),
        tags: tags.clone(),
    };
    let artifact = repo.put_artifact(&request).await?;

    deploy(repo, dags, dag_id, artifact).await
}

/// Cuts a new immutable version from LATEST and deploys it as `<dag_id>_v<n>`.
#[instrument(skip(repo, dags), fields(dag_id = %dag_id))]
pub async fn publish_dag_version(
    repo: &dyn ArtifactRepository,
    dags: &dyn DagFolder,
    dag_id: &DagId,
) -> Result<PublishedDag, DagArtifactError> {
    let artifact = repo.publish_artifact_version(dag_id.as_str()).await?;
    deploy(repo, dags, dag_id, artifact).await
}

/// Redeploys an already stored version (rollback). Nothing new is stored.
#[instrument(skip(repo, dags), fields(dag_id = %dag_id, version = %version))]
pub async fn deploy_dag_version(
    repo: &dyn ArtifactRepository,
    dags: &dyn DagFolder,
    dag_id: &DagId,
    version: ArtifactVersion,
) -> Result<PublishedDag, DagArtifactError> {
    let artifact = repo.get_artifact(dag_id.as_str(), version).await?;
    deploy(repo, dags, dag_id, artifact).await
}

async fn deploy(
    repo: &dyn ArtifactRepository,
    dags: &dyn DagFolder,
    dag_id: &DagId,
    artifact: Artifact,
) -> Result<PublishedDag, DagArtifactError> {
    let content = repo
        .get_artifact_content(&artifact.name, artifact.version)
        .await?;
    let file = deployment_file(&content, dag_id, DagAlias::from(artifact.version))?;
    let location = dags.write_dag(&file.file_name, &file.content).await?;
    info!(deployed_dag_id = %file.deployed_dag_id, location = %location, "DAG deployed");

    Ok(PublishedDag {
        artifact,
        deployed_dag_id: file.deployed_dag_id,
        location,
    })
}
