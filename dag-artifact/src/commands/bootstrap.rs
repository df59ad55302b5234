// dag-artifact/src/commands/bootstrap.rs
//
// USE CASE: Provision the artifact bucket and metadata table.

use std::path::PathBuf;

use dag_artifact_core::application::bootstrap;
use dag_artifact_core::ports::BootstrapOptions;

pub async fn execute(
    project_dir: PathBuf,
    read_capacity: Option<i64>,
    write_capacity: Option<i64>,
) -> anyhow::Result<()> {
    let adapters = super::load_adapters(&project_dir).await?;
    let options = BootstrapOptions {
        dynamodb_read_capacity_units: read_capacity,
        dynamodb_write_capacity_units: write_capacity,
    };

    bootstrap(adapters.repository.as_ref(), &options).await?;
    println!("✨ Artifact store ready.");
    Ok(())
}
