// dag-artifact-core/src/infrastructure/adapters/mod.rs

pub mod aws_repository;
pub mod local_folder;
pub mod local_repository;
pub mod s3_folder;

pub use aws_repository::AwsRepository;
pub use local_folder::LocalDagFolder;
pub use local_repository::LocalRepository;
pub use s3_folder::S3DagFolder;

use aws_config::SdkConfig;
use tracing::{info, instrument};

use crate::domain::project::{Backend, DagArtifactConfig};
use crate::error::DagArtifactError;
use crate::infrastructure::storage::{S3Store, S3Uri, load_sdk_config, s3_client};
use crate::ports::{ArtifactRepository, DagFolder};

/// The pair of adapters every use case runs against.
pub struct Adapters {
    pub repository: Box<dyn ArtifactRepository>,
    pub dags: Box<dyn DagFolder>,
}

/// Builds the repository and DAG folder described by `config`.
///
/// The AWS SDK configuration is only loaded when something actually talks to AWS
/// (AWS backend, or an `s3://` DAG folder).
#[instrument(skip(config), fields(backend = ?config.backend))]
pub async fn connect(config: &DagArtifactConfig) -> Result<Adapters, DagArtifactError> {
    let needs_aws = config.backend == Backend::Aws || config.dags_folder_is_s3();
    let sdk_config: Option<SdkConfig> = if needs_aws {
        Some(load_sdk_config(&config.aws_region, config.endpoint_url.as_deref()).await)
    } else {
        None
    };

    let repository: Box<dyn ArtifactRepository> = match (&config.backend, &sdk_config) {
        (Backend::Aws, Some(sdk)) => Box::new(AwsRepository::from_sdk_config(sdk, config)),
        (Backend::Aws, None) => {
            return Err(DagArtifactError::InternalError(
                "AWS backend selected without SDK configuration".into(),
            ));
        }
        (Backend::Local, _) => Box::new(LocalRepository::from_config(config)),
    };

    let dags: Box<dyn DagFolder> = match &sdk_config {
        Some(sdk) if config.dags_folder_is_s3() => {
            let dir = S3Uri::parse(&config.dags_folder)?;
            let store = S3Store::new(
                s3_client(sdk, config.endpoint_url.as_deref()),
                dir.bucket.clone(),
            );
            Box::new(S3DagFolder::new(store, dir))
        }
        _ => Box::new(LocalDagFolder::new(&config.dags_folder)),
    };

    info!(dags_folder = %config.dags_folder, "Adapters ready");
    Ok(Adapters { repository, dags })
}
