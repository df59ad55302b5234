// dag-artifact-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::{Validate, ValidationError};

/// Where artifacts and their metadata live.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// S3 for artifact bytes, DynamoDB for version metadata.
    #[default]
    Aws,
    /// Same layout on the local filesystem (dev / dry-run).
    Local,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

/// Immutable settings of one artifact store + MWAA DAG folder.
///
/// Built once (usually by `load_project_config`) and handed to the adapters;
/// nothing mutates it afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct DagArtifactConfig {
    #[serde(default)]
    pub backend: Backend,

    #[validate(length(min = 1, message = "aws_region cannot be empty"))]
    pub aws_region: String,

    #[validate(length(min = 3, max = 63, message = "s3_bucket must be 3-63 characters"))]
    pub s3_bucket: String,

    #[serde(default = "default_s3_prefix")]
    pub s3_prefix: String,

    #[validate(length(min = 3, max = 255, message = "dynamodb_table_name must be 3-255 characters"))]
    #[serde(default = "default_table_name")]
    pub dynamodb_table_name: String,

    /// MWAA DAG folder: `s3://bucket/dags/` or a local directory.
    #[validate(custom(function = "validate_dags_folder"))]
    pub dags_folder: String,

    /// Custom S3/DynamoDB endpoint (LocalStack, MinIO...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Root directory of the `local` backend.
    #[serde(default = "default_local_root")]
    pub local_root: PathBuf,
}

impl DagArtifactConfig {
    pub fn dags_folder_is_s3(&self) -> bool {
        self.dags_folder.starts_with("s3://")
    }
}

fn validate_dags_folder(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("dags_folder_empty"));
    }
    if let Some(rest) = value.strip_prefix("s3://") {
        if rest.split('/').next().unwrap_or_default().is_empty() {
            return Err(ValidationError::new("dags_folder_missing_bucket"));
        }
    }
    Ok(())
}

fn default_s3_prefix() -> String {
    "versioned-artifacts".to_string()
}
fn default_table_name() -> String {
    "versioned-artifacts".to_string()
}
fn default_local_root() -> PathBuf {
    PathBuf::from(".dag_artifact")
}
