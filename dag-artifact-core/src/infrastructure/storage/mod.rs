// dag-artifact-core/src/infrastructure/storage/mod.rs

pub mod dynamodb;
pub mod error;
pub mod s3;

pub use dynamodb::MetadataTable;
pub use error::StorageError;
pub use s3::{S3Store, S3Uri};

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared AWS SDK configuration (credentials chain + region [+ endpoint]).
pub async fn load_sdk_config(region: &str, endpoint_url: Option<&str>) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

pub fn s3_client(sdk_config: &SdkConfig, endpoint_url: Option<&str>) -> aws_sdk_s3::Client {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
    if endpoint_url.is_some() {
        // Required for most S3-compatible services
        builder = builder.force_path_style(true);
    }
    aws_sdk_s3::Client::from_conf(builder.build())
}

pub fn dynamodb_client(sdk_config: &SdkConfig) -> aws_sdk_dynamodb::Client {
    aws_sdk_dynamodb::Client::new(sdk_config)
}
