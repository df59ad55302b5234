// dag-artifact-core/src/ports/dag_folder.rs

use async_trait::async_trait;

use crate::error::DagArtifactError;

/// The Airflow DAG folder that MWAA (or a local scheduler) parses.
#[async_trait]
pub trait DagFolder: Send + Sync {
    /// Creates or overwrites `file_name` and returns its location.
    async fn write_dag(&self, file_name: &str, content: &str) -> Result<String, DagArtifactError>;

    fn location(&self, file_name: &str) -> String;
}
