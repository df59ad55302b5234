// dag-artifact-core/src/infrastructure/adapters/aws_repository.rs

use async_trait::async_trait;
use aws_config::SdkConfig;
use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use crate::domain::artifact::{
    Artifact, ArtifactRecord, ArtifactVersion, artifact_dir_key, artifact_key, next_version,
};
use crate::domain::dag::sha256_hex;
use crate::domain::error::DomainError;
use crate::domain::project::DagArtifactConfig;
use crate::error::DagArtifactError;
use crate::infrastructure::storage::{
    MetadataTable, S3Store, StorageError, dynamodb_client, s3_client,
};
use crate::ports::repository::{ArtifactRepository, BootstrapOptions, PutArtifact};

/// Deletes are issued concurrently, at most this many at a time.
const DELETE_BATCH: usize = 100;

/// Artifacts in S3, version records in DynamoDB.
#[derive(Debug, Clone)]
pub struct AwsRepository {
    store: S3Store,
    table: MetadataTable,
    prefix: String,
    region: String,
}

impl AwsRepository {
    pub fn new(store: S3Store, table: MetadataTable, prefix: &str, region: &str) -> Self {
        Self {
            store,
            table,
            prefix: prefix.trim_matches('/').to_string(),
            region: region.to_string(),
        }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, config: &DagArtifactConfig) -> Self {
        let store = S3Store::new(
            s3_client(sdk_config, config.endpoint_url.as_deref()),
            &config.s3_bucket,
        );
        let table = MetadataTable::new(dynamodb_client(sdk_config), &config.dynamodb_table_name);
        Self::new(store, table, &config.s3_prefix, &config.aws_region)
    }

    fn key(&self, name: &str, version: ArtifactVersion) -> String {
        artifact_key(&self.prefix, name, version)
    }

    fn to_artifact(&self, record: ArtifactRecord) -> Artifact {
        let uri = self.get_artifact_uri(&record.name, record.version);
        record.into_artifact(uri)
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), DagArtifactError> {
        for batch in keys.chunks(DELETE_BATCH) {
            try_join_all(batch.iter().map(|key| self.store.delete_object(key))).await?;
        }
        Ok(())
    }

    async fn delete_records(&self, keys: &[(String, String)]) -> Result<(), DagArtifactError> {
        for batch in keys.chunks(DELETE_BATCH) {
            try_join_all(
                batch
                    .iter()
                    .map(|(name, version)| self.table.delete_record(name, version)),
            )
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactRepository for AwsRepository {
    #[instrument(skip(self, options), fields(bucket = %self.store.bucket(), table = %self.table.table_name()))]
    async fn bootstrap(&self, options: &BootstrapOptions) -> Result<(), DagArtifactError> {
        if self.store.bucket_exists().await? {
            debug!("Bucket already exists");
        } else {
            self.store.create_bucket(&self.region).await?;
            info!("Bucket created");
        }

        if self.table.table_exists().await? {
            debug!("Metadata table already exists");
        } else {
            self.table.create_table(options).await?;
            info!("Metadata table created");
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn put_artifact(&self, request: &PutArtifact) -> Result<Artifact, DagArtifactError> {
        let key = self.key(&request.name, ArtifactVersion::Latest);
        self.store
            .put_object(
                &key,
                request.content.clone(),
                &request.content_type,
                &request.metadata,
            )
            .await?;
        if !request.tags.is_empty() {
            self.store.put_tags(&key, &request.tags).await?;
        }

        let record = ArtifactRecord {
            name: request.name.clone(),
            version: ArtifactVersion::Latest,
            sha256: sha256_hex(&request.content),
            update_at: Utc::now(),
        };
        self.table.put_record(&record).await?;
        info!(uri = %self.store.uri(&key), "LATEST artifact uploaded");

        Ok(self.to_artifact(record))
    }

    #[instrument(skip(self))]
    async fn publish_artifact_version(&self, name: &str) -> Result<Artifact, DagArtifactError> {
        let records = self.table.query_records(name).await?;
        let latest = records
            .iter()
            .find(|r| r.version.is_latest())
            .ok_or_else(|| DomainError::ArtifactNotFound {
                name: name.to_string(),
                version: ArtifactVersion::Latest.to_string(),
            })?;

        let Some(version) = next_version(latest, &records)? else {
            let newest = records
                .iter()
                .filter(|r| !r.version.is_latest())
                .max_by_key(|r| r.version)
                .cloned()
                .ok_or_else(|| DagArtifactError::InternalError("no version to reuse".into()))?;
            warn!(version = %newest.version, "LATEST unchanged since last version, reusing it");
            return Ok(self.to_artifact(newest));
        };

        // Server-side copy keeps the object metadata and tags.
        self.store
            .copy_object(
                &self.key(name, ArtifactVersion::Latest),
                &self.key(name, version),
            )
            .await?;
        let record = ArtifactRecord {
            name: name.to_string(),
            version,
            sha256: latest.sha256.clone(),
            update_at: Utc::now(),
        };
        self.table.put_record(&record).await?;
        info!(version = %version, "New immutable version published");

        Ok(self.to_artifact(record))
    }

    async fn get_artifact(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<Artifact, DagArtifactError> {
        let record = self.table.get_record(name, version).await?.ok_or_else(|| {
            DomainError::ArtifactNotFound {
                name: name.to_string(),
                version: version.to_string(),
            }
        })?;
        Ok(self.to_artifact(record))
    }

    async fn get_artifact_content(
        &self,
        name: &str,
        version: ArtifactVersion,
    ) -> Result<String, DagArtifactError> {
        let bytes = match self.store.get_object(&self.key(name, version)).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound { .. }) => {
                return Err(DomainError::ArtifactNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes).map_err(|e| {
            StorageError::CorruptedRecord(format!("artifact '{}' is not UTF-8: {}", name, e)).into()
        })
    }

    fn get_artifact_uri(&self, name: &str, version: ArtifactVersion) -> String {
        self.store.uri(&self.key(name, version))
    }

    async fn list_artifact_versions(&self, name: &str) -> Result<Vec<Artifact>, DagArtifactError> {
        let mut records = self.table.query_records(name).await?;
        records.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(records.into_iter().map(|r| self.to_artifact(r)).collect())
    }

    #[instrument(skip(self))]
    async fn purge_artifact(&self, name: &str) -> Result<(), DagArtifactError> {
        let records: Vec<(String, String)> = self
            .table
            .query_records(name)
            .await?
            .into_iter()
            .map(|r| (r.name, r.version.encode()))
            .collect();
        self.delete_records(&records).await?;

        let keys = self
            .store
            .list_keys(&artifact_dir_key(&self.prefix, name))
            .await?;
        self.delete_objects(&keys).await?;

        info!(records = records.len(), objects = keys.len(), "Artifact purged");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_all(&self) -> Result<(), DagArtifactError> {
        let records = self.table.scan_keys().await?;
        self.delete_records(&records).await?;

        let prefix = if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", self.prefix)
        };
        let keys = self.store.list_keys(&prefix).await?;
        self.delete_objects(&keys).await?;

        info!(records = records.len(), objects = keys.len(), "All artifacts purged");
        Ok(())
    }
}
