// dag-artifact-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::infrastructure::storage::StorageError;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- OBJECT STORE / METADATA TABLE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(code(dag_artifact::infra::storage))]
    Storage(#[from] StorageError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dag_artifact::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(dag_artifact::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(dag_artifact::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(dag_artifact::infra::validation),
        help("Fix the fields listed above in dag_artifact.yaml.")
    )]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(dag_artifact::infra::config_missing))]
    ConfigNotFound(String),
}
