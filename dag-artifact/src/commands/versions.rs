// dag-artifact/src/commands/versions.rs
//
// USE CASE: List the stored versions of a DAG.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

use dag_artifact_core::application::list_dag_versions;
use dag_artifact_core::domain::{Artifact, DagAlias, DagId};

pub async fn execute(project_dir: PathBuf, dag_id: DagId) -> anyhow::Result<()> {
    let adapters = super::load_adapters(&project_dir).await?;
    let artifacts = list_dag_versions(adapters.repository.as_ref(), &dag_id).await?;

    if artifacts.is_empty() {
        println!("🤷 No stored version for '{}'.", dag_id);
        return Ok(());
    }

    println!("{}", render(&dag_id, &artifacts));
    Ok(())
}

fn render(dag_id: &DagId, artifacts: &[Artifact]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Version", "Deployed dag_id", "sha256", "Updated", "URI"]);

    for artifact in artifacts {
        table.add_row(vec![
            artifact.version.to_string(),
            DagAlias::from(artifact.version).qualify(dag_id),
            artifact.sha256.chars().take(12).collect::<String>(),
            artifact.update_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            artifact.uri.clone(),
        ]);
    }
    table
}
