// dag-artifact-core/src/application/bootstrap.rs

use tracing::{info, instrument};

use crate::error::DagArtifactError;
use crate::ports::{ArtifactRepository, BootstrapOptions};

/// Provisions the bucket and the metadata table. Safe to run repeatedly.
#[instrument(skip(repo))]
pub async fn bootstrap(
    repo: &dyn ArtifactRepository,
    options: &BootstrapOptions,
) -> Result<(), DagArtifactError> {
    info!("🏗️  Provisioning artifact store...");
    repo.bootstrap(options).await
}
