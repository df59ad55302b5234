// dag-artifact-core/src/infrastructure/adapters/local_folder.rs

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::error::DagArtifactError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::dag_folder::DagFolder;

/// A DAG folder on the local filesystem (a mounted or synced scheduler folder).
#[derive(Debug, Clone)]
pub struct LocalDagFolder {
    root: PathBuf,
}

impl LocalDagFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DagFolder for LocalDagFolder {
    async fn write_dag(&self, file_name: &str, content: &str) -> Result<String, DagArtifactError> {
        let path = self.root.join(file_name);
        atomic_write(&path, content)?;
        debug!(path = ?path, "Deployment file written");
        Ok(self.location(file_name))
    }

    fn location(&self, file_name: &str) -> String {
        self.root.join(file_name).to_string_lossy().into_owned()
    }
}
