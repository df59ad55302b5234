// dag-artifact/src/commands/purge.rs
//
// USE CASE: Irreversibly delete stored artifacts. Deployed files are kept.

use std::path::PathBuf;

use dag_artifact_core::application::{purge_all_dag, purge_dag};
use dag_artifact_core::domain::DagId;

pub async fn execute(project_dir: PathBuf, dag_id: DagId) -> anyhow::Result<()> {
    let adapters = super::load_adapters(&project_dir).await?;
    purge_dag(adapters.repository.as_ref(), &dag_id).await?;
    println!("🗑️  Every stored version of '{}' deleted.", dag_id);
    Ok(())
}

pub async fn execute_all(project_dir: PathBuf, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("❌ Refusing to delete every artifact without --yes");
    }
    let adapters = super::load_adapters(&project_dir).await?;
    purge_all_dag(adapters.repository.as_ref()).await?;
    println!("🗑️  Every stored artifact deleted.");
    Ok(())
}
