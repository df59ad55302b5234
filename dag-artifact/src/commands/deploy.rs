// dag-artifact/src/commands/deploy.rs
//
// USE CASE: Redeploy a stored version (rollback).

use std::path::PathBuf;

use dag_artifact_core::application::deploy_dag_version;
use dag_artifact_core::domain::{ArtifactVersion, DagId};

pub async fn execute(
    project_dir: PathBuf,
    dag_id: DagId,
    version: ArtifactVersion,
) -> anyhow::Result<()> {
    let adapters = super::load_adapters(&project_dir).await?;

    println!("⏪ Deploying '{}' version {}...", dag_id, version);
    let published = deploy_dag_version(
        adapters.repository.as_ref(),
        adapters.dags.as_ref(),
        &dag_id,
        version,
    )
    .await?;

    println!(
        "✨ Deployed '{}' to {}",
        published.deployed_dag_id, published.location
    );
    Ok(())
}
