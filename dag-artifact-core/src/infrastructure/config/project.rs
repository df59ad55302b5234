// dag-artifact-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::DagArtifactConfig;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["dag_artifact.yaml", "dag_artifact.yml"];

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(
    project_dir: &Path,
) -> Result<DagArtifactConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading dag-artifact configuration");

    // 2. Chargement YAML Base
    let content = fs::read_to_string(&config_path)?;
    let mut config: DagArtifactConfig = serde_yaml::from_str(&content)?;

    // 3. Override via Variables d'Environnement (Pattern 'Layering')
    // DAG_ARTIFACT_DAGS_FOLDER=/tmp/dags dag-artifact publish ...
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;

    // 4. Relative local paths are resolved against the project, not the CWD
    resolve_local_paths(&mut config, project_dir);

    config.validate()?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Applies `DAG_ARTIFACT_*` overrides read through `lookup`.
pub fn apply_overrides<F>(
    config: &mut DagArtifactConfig,
    lookup: F,
) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("DAG_ARTIFACT_BACKEND") {
        info!(old = ?config.backend, new = ?val, "Overriding backend via ENV");
        config.backend = val.parse().map_err(InfrastructureError::ConfigError)?;
    }
    if let Some(val) = lookup("DAG_ARTIFACT_AWS_REGION") {
        info!(old = ?config.aws_region, new = ?val, "Overriding region via ENV");
        config.aws_region = val;
    }
    if let Some(val) = lookup("DAG_ARTIFACT_S3_BUCKET") {
        info!(old = ?config.s3_bucket, new = ?val, "Overriding bucket via ENV");
        config.s3_bucket = val;
    }
    if let Some(val) = lookup("DAG_ARTIFACT_DAGS_FOLDER") {
        info!(old = ?config.dags_folder, new = ?val, "Overriding dags folder via ENV");
        config.dags_folder = val;
    }
    if let Some(val) = lookup("DAG_ARTIFACT_ENDPOINT_URL") {
        info!(new = ?val, "Overriding endpoint via ENV");
        config.endpoint_url = Some(val);
    }
    Ok(())
}

fn resolve_local_paths(config: &mut DagArtifactConfig, project_dir: &Path) {
    if config.local_root.is_relative() {
        config.local_root = project_dir.join(&config.local_root);
    }
    if !config.dags_folder_is_s3() && Path::new(&config.dags_folder).is_relative() {
        config.dags_folder = project_dir
            .join(&config.dags_folder)
            .to_string_lossy()
            .into_owned();
    }
}
