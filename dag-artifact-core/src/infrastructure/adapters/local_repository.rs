// dag-artifact-core/src/infrastructure/adapters/local_repository.rs

// Filesystem twin of the AWS repository. Same key layout, with the bucket
// and the metadata table mapped to directories under `local_root`:
//
//   <local_root>/<s3_bucket>/<s3_prefix>/<name>/LATEST.py
//   <local_root>/<s3_bucket>/<s3_prefix>/<name>/000001.py
//   <local_root>/<dynamodb_table_name>/<name>.json

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::domain::artifact::{
    Artifact, ArtifactRecord, ArtifactVersion, artifact_dir_key, artifact_key, next_version,
};
use crate::domain::dag::{DagId, sha256_hex};
use crate::domain::error::DomainError;
use crate::domain::project::DagArtifactConfig;
use crate::error::DagArtifactError;
use crate::infrastructure::fs::{atomic_write, remove_path};
use crate::ports::repository::{ArtifactRepository, BootstrapOptions, PutArtifact};

/// One row of the local metadata "table".
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalItem {
    #[serde(flatten)]
    record: ArtifactRecord,
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Names become path segments: anything `DagId` refuses is refused here too.
fn checked_name(name: &str) -> Result<&str, DagArtifactError> {
    DagId::new(name)?;
    Ok(name)
}

#[derive(Debug, Clone)]
pub struct LocalRepository {
    objects_dir: PathBuf,
    prefix: String,
    table_dir: PathBuf,
}

impl LocalRepository {
    pub fn new(local_root: &Path, bucket: &str, prefix: &str, table_name: &str) -> Self {
        Self {
            objects_dir: local_root.join(bucket),
            prefix: prefix.trim_matches('/').to_string(),
            table_dir: local_root.join(table_name),
        }
    }

    pub fn from_config(config: &DagArtifactConfig) -> Self {
        Self::new(
            &config.local_root,
            &config.s3_bucket,
            &config.s3_prefix,
            &config.dynamodb_table_name,
        )
    }

    fn object_path(&self, name: &str, version: ArtifactVersion) -> PathBuf {
        self.objects_dir
            .join(artifact_key(&self.prefix, name, version))
    }

    fn table_file(&self, name: &str) -> PathBuf {
        self.table_dir.join(format!("{}.json", name))
    }

    /// Keyed by encoded version, so the JSON file reads in version order.
    fn load_items(&self, name: &str) -> Result<BTreeMap<String, LocalItem>, DagArtifactError> {
        let path = self.table_file(name);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_items(
        &self,
        name: &str,
        items: &BTreeMap<String, LocalItem>,
    ) -> Result<(), DagArtifactError> {
        let json = serde_json::to_string_pretty(items)?;
        atomic_write(self.table_file(name), json)?;
        Ok(())
    }

    fn to_artifact(&self, record: ArtifactRecord) -> Artifact {
        let uri = self.get_artifact_uri(&record.name, record.version);
        record.into_artifact(uri)
    }
}

#[async_trait]
impl ArtifactRepository for LocalRepository {
    async fn bootstrap(&self, _options: &BootstrapOptions) -> Result<(), DagArtifactError> {
        fs::create_dir_all(&self.objects_dir)?;
        fs::create_dir_all(&self.table_dir)?;
        info!(objects = ?self.objects_dir, table = ?self.table_dir, "Local artifact store ready");
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn put_artifact(&self, request: &PutArtifact) -> Result<Artifact, DagArtifactError> {
        let path = self.object_path(checked_name(&request.name)?, ArtifactVersion::Latest);
        atomic_write(&path, &request.content)?;
        debug!(path = ?path, "LATEST object written");

        let record = ArtifactRecord {
            name: request.name.clone(),
            version: ArtifactVersion::Latest,
            sha256: sha256_hex(&request.content),
            update_at: Utc::now(),
        };
        let mut items = self.load_items(&request.name)?;
        items.insert(
            record.version.encode(),
            LocalItem {
                record: record.clone(),
                content_type: request.content_type.clone(),
                metadata: request.metadata.clone(),
                tags: request.tags.clone(),
            },
        );
        self.save_items(&request.name, &items)?;

        Ok(self.to_artifact(record))
    }

    #[instrument(skip(self))]
    async fn publish_artifact_version(&self, name: &str) -> Result<Artifact, DagArtifactError> {
        let mut items = self.load_items(name)?;
        let latest = items
            .get(&ArtifactVersion::Latest.encode())
            .cloned()
            .ok_or_else(|| DomainError::ArtifactNotFound {
                name: name.to_string(),
                version: ArtifactVersion::Latest.to_string(),
            })?;

        let records: Vec<ArtifactRecord> = items.values().map(|i| i.record.clone()).collect();
        let Some(version) = next_version(&latest.record, &records)? else {
            let newest = records
                .into_iter()
                .filter(|r| !r.version.is_latest())
                .max_by_key(|r| r.version)
                .ok_or_else(|| DagArtifactError::InternalError("no version to reuse".into()))?;
            warn!(version = %newest.version, "LATEST unchanged since last version, reusing it");
            return Ok(self.to_artifact(newest));
        };

        fs::copy(
            self.object_path(name, ArtifactVersion::Latest),
            self.object_path(name, version),
        )?;
        let record = ArtifactRecord {
            name: name.to_string(),
            version,
            sha256: latest.record.sha256.clone(),
            update_at: Utc::now(),
        };
        items.insert(
            version.encode(),
            LocalItem {
                record: record.clone(),
                ..latest
            },
        );
        self.save_items(name, &items)?;
        info!(version = %version, "New immutable version published");

        Ok(self.to_artifact(record))
    }

    async fn get_artifact(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<Artifact, DagArtifactError> {
        let items = self.load_items(name)?;
        let item = items
            .get(&version.encode())
            .ok_or_else(|| DomainError::ArtifactNotFound {
                name: name.to_string(),
                version: version.to_string(),
            })?;
        Ok(self.to_artifact(item.record.clone()))
    }

    async fn get_artifact_content(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<String, DagArtifactError> {
        let artifact = self.get_artifact(name, version).await?;
        Ok(fs::read_to_string(&artifact.uri)?)
    }

    fn get_artifact_uri(&self, name: &str, version: ArtifactVersion) -> String {
        self.object_path(name, version).to_string_lossy().into_owned()
    }

    async fn list_artifact_versions(&self, name: &str) -> Result<Vec<Artifact>, DagArtifactError> {
        let mut records: Vec<ArtifactRecord> = self
            .load_items(name)?
            .into_values()
            .map(|i| i.record)
            .collect();
        records.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(records.into_iter().map(|r| self.to_artifact(r)).collect())
    }

    #[instrument(skip(self))]
    async fn purge_artifact(&self, name: &str) -> Result<(), DagArtifactError> {
        let name = checked_name(name)?;
        remove_path(&self.objects_dir.join(artifact_dir_key(&self.prefix, name)))?;
        remove_path(&self.table_file(name))?;
        info!("Artifact purged");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_all(&self) -> Result<(), DagArtifactError> {
        remove_path(&self.objects_dir.join(&self.prefix))?;
        remove_path(&self.table_dir)?;
        info!("All artifacts purged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn put(name: &str, content: &str) -> PutArtifact {
        PutArtifact {
            name: name.to_string(),
            content: content.as_bytes().to_vec(),
            content_type: "text/plain".to_string(),
            metadata: BTreeMap::from([("foo".to_string(), "bar".to_string())]),
            tags: BTreeMap::new(),
        }
    }

    fn repo(root: &Path) -> LocalRepository {
        LocalRepository::new(root, "my-bucket", "airflow-artifact", "airflow-artifact")
    }

    #[tokio::test]
    async fn test_put_then_publish_layout() -> Result<()> {
        let dir = tempdir()?;
        let repo = repo(dir.path());
        repo.bootstrap(&BootstrapOptions::default()).await?;

        let latest = repo.put_artifact(&put("airflow_dag_script_1", "v1")).await?;
        assert_eq!(latest.version, ArtifactVersion::Latest);
        assert!(latest
            .uri
            .ends_with("my-bucket/airflow-artifact/airflow_dag_script_1/LATEST.py"));

        let v1 = repo.publish_artifact_version("airflow_dag_script_1").await?;
        assert_eq!(v1.version, ArtifactVersion::Numbered(1));
        assert!(v1
            .uri
            .ends_with("my-bucket/airflow-artifact/airflow_dag_script_1/000001.py"));
        assert_eq!(fs::read_to_string(&v1.uri)?, "v1");
        Ok(())
    }

    #[tokio::test]
    async fn test_versions_increment_and_dedup() -> Result<()> {
        let dir = tempdir()?;
        let repo = repo(dir.path());

        repo.put_artifact(&put("dag1", "a")).await?;
        assert_eq!(
            repo.publish_artifact_version("dag1").await?.version,
            ArtifactVersion::Numbered(1)
        );
        // unchanged LATEST -> same version
        assert_eq!(
            repo.publish_artifact_version("dag1").await?.version,
            ArtifactVersion::Numbered(1)
        );

        repo.put_artifact(&put("dag1", "b")).await?;
        assert_eq!(
            repo.publish_artifact_version("dag1").await?.version,
            ArtifactVersion::Numbered(2)
        );
        repo.put_artifact(&put("dag1", "c")).await?;
        assert_eq!(
            repo.publish_artifact_version("dag1").await?.version,
            ArtifactVersion::Numbered(3)
        );

        // old versions are immutable
        assert_eq!(
            repo.get_artifact_content("dag1", ArtifactVersion::Numbered(1))
                .await?,
            "a"
        );
        assert_eq!(
            repo.get_artifact_content("dag1", ArtifactVersion::Latest)
                .await?,
            "c"
        );

        let listed: Vec<ArtifactVersion> = repo
            .list_artifact_versions("dag1")
            .await?
            .into_iter()
            .map(|a| a.version)
            .collect();
        assert_eq!(
            listed,
            vec![
                ArtifactVersion::Latest,
                ArtifactVersion::Numbered(3),
                ArtifactVersion::Numbered(2),
                ArtifactVersion::Numbered(1),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_publish_without_latest_fails() -> Result<()> {
        let dir = tempdir()?;
        let repo = repo(dir.path());
        let err = repo.publish_artifact_version("ghost").await;
        assert!(matches!(err, Err(ref e) if e.is_not_found()));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_keeps_sha256_and_metadata() -> Result<()> {
        let dir = tempdir()?;
        let repo = repo(dir.path());
        let artifact = repo.put_artifact(&put("dag1", "abc")).await?;
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let table = fs::read_to_string(dir.path().join("airflow-artifact/dag1.json"))?;
        assert!(table.contains("\"LATEST\""));
        assert!(table.contains("\"foo\": \"bar\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_path_like_names_never_reach_the_filesystem() -> Result<()> {
        let dir = tempdir()?;
        let repo = repo(dir.path());
        repo.put_artifact(&put("etl", "keep me")).await?;

        for name in [".", "..", "", "../etl"] {
            let purged = repo.purge_artifact(name).await;
            assert!(
                matches!(
                    purged,
                    Err(DagArtifactError::Domain(DomainError::InvalidDagId(_)))
                ),
                "purge of '{}' should be refused",
                name
            );
            assert!(repo.put_artifact(&put(name, "x")).await.is_err());
        }

        assert_eq!(
            repo.get_artifact_content("etl", ArtifactVersion::Latest)
                .await?,
            "keep me"
        );
        assert!(
            !dir.path()
                .join("my-bucket/airflow-artifact/LATEST.py")
                .exists()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_purge_artifact_and_purge_all() -> Result<()> {
        let dir = tempdir()?;
        let repo = repo(dir.path());
        repo.put_artifact(&put("dag1", "a")).await?;
        repo.put_artifact(&put("dag2", "b")).await?;

        repo.purge_artifact("dag1").await?;
        assert!(
            repo.get_artifact("dag1", ArtifactVersion::Latest)
                .await
                .is_err()
        );
        assert!(repo.get_artifact("dag2", ArtifactVersion::Latest).await.is_ok());

        repo.purge_all().await?;
        let err = repo.get_artifact("dag2", ArtifactVersion::Latest).await;
        assert!(matches!(err, Err(ref e) if e.is_not_found()));
        assert!(repo.list_artifact_versions("dag2").await?.is_empty());
        Ok(())
    }
}
