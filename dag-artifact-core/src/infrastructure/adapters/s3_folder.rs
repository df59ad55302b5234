// dag-artifact-core/src/infrastructure/adapters/s3_folder.rs

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::DagArtifactError;
use crate::infrastructure::storage::{S3Store, S3Uri};
use crate::ports::dag_folder::DagFolder;

const PYTHON_CONTENT_TYPE: &str = "text/x-python";

/// A DAG folder in S3, e.g. `s3://my-mwaa-bucket/dags/`.
#[derive(Debug, Clone)]
pub struct S3DagFolder {
    store: S3Store,
    dir: S3Uri,
}

impl S3DagFolder {
    /// `store` must be bound to the bucket named in `dir`.
    pub fn new(store: S3Store, dir: S3Uri) -> Self {
        Self {
            store,
            dir: dir.to_dir(),
        }
    }
}

#[async_trait]
impl DagFolder for S3DagFolder {
    async fn write_dag(&self, file_name: &str, content: &str) -> Result<String, DagArtifactError> {
        let target = self.dir.join(file_name);
        self.store
            .put_object(
                &target.key,
                content.as_bytes().to_vec(),
                PYTHON_CONTENT_TYPE,
                &BTreeMap::new(),
            )
            .await?;
        debug!(uri = %target, "Deployment file uploaded");
        Ok(target.to_string())
    }

    fn location(&self, file_name: &str) -> String {
        self.dir.join(file_name).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_smithy_mocks::{RuleMode, mock, mock_client};

    #[tokio::test]
    async fn test_write_dag_uploads_python_file_under_folder() -> Result<()> {
        let upload = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|req| {
                req.bucket() == Some("mwaa")
                    && req.key() == Some("dags/etl_latest.py")
                    && req.content_type() == Some("text/x-python")
            })
            .then_output(|| PutObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&upload]);

        // No trailing slash: the folder is still joined with one.
        let folder = S3DagFolder::new(S3Store::new(client, "mwaa"), S3Uri::parse("s3://mwaa/dags")?);
        let uri = folder.write_dag("etl_latest.py", "from x import y\n").await?;

        assert_eq!(uri, "s3://mwaa/dags/etl_latest.py");
        assert_eq!(folder.location("etl_latest.py"), uri);
        assert_eq!(upload.num_calls(), 1);
        Ok(())
    }
}
