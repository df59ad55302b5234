// dag-artifact/src/commands/mod.rs

pub mod bootstrap;
pub mod deploy;
pub mod publish;
pub mod purge;
pub mod release;
pub mod versions;

use anyhow::Context;
use std::path::Path;

use dag_artifact_core::infrastructure::adapters::{Adapters, connect};
use dag_artifact_core::infrastructure::config::load_project_config;

/// Loads `dag_artifact.yaml` from `project_dir` and wires the adapters.
pub async fn load_adapters(project_dir: &Path) -> anyhow::Result<Adapters> {
    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir)
        .with_context(|| format!("Cannot load configuration from {}", project_dir.display()))?;
    println!(
        "   Backend: {:?} | bucket: {} | dags: {}",
        config.backend, config.s3_bucket, config.dags_folder
    );
    Ok(connect(&config).await?)
}
