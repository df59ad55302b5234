// dag-artifact/src/commands/release.rs
//
// USE CASE: Snapshot LATEST as a new immutable version.

use std::path::PathBuf;

use dag_artifact_core::application::publish_dag_version;
use dag_artifact_core::domain::DagId;

pub async fn execute(project_dir: PathBuf, dag_id: DagId) -> anyhow::Result<()> {
    let adapters = super::load_adapters(&project_dir).await?;

    println!("📦 Releasing a new version of '{}'...", dag_id);
    let published =
        publish_dag_version(adapters.repository.as_ref(), adapters.dags.as_ref(), &dag_id).await?;

    println!(
        "   Version {} -> {}",
        published.artifact.version, published.artifact.uri
    );
    println!(
        "✨ Deployed '{}' to {}",
        published.deployed_dag_id, published.location
    );
    Ok(())
}
