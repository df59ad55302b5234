// dag-artifact/src/commands/publish.rs
//
// USE CASE: Upload a DAG script to LATEST and deploy '<dag_id>_latest'.

use std::collections::BTreeMap;
use std::path::PathBuf;

use dag_artifact_core::application::publish_dag;
use dag_artifact_core::domain::DagId;

pub async fn execute(
    project_dir: PathBuf,
    dag_id: DagId,
    script: PathBuf,
    metadata: Vec<(String, String)>,
    tags: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let adapters = super::load_adapters(&project_dir).await?;
    let metadata: BTreeMap<String, String> = metadata.into_iter().collect();
    let tags: BTreeMap<String, String> = tags.into_iter().collect();

    println!("🚀 Publishing '{}' from {}...", dag_id, script.display());
    let published = publish_dag(
        adapters.repository.as_ref(),
        adapters.dags.as_ref(),
        &dag_id,
        &script,
        &metadata,
        &tags,
    )
    .await?;

    println!("   📦 Artifact: {}", published.artifact.uri);
    println!("   🔐 sha256:   {}", published.artifact.sha256);
    println!(
        "✨ Deployed '{}' to {}",
        published.deployed_dag_id, published.location
    );
    Ok(())
}
