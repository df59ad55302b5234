// dag-artifact-core/src/application/mod.rs

pub mod bootstrap;
pub mod inspect;
pub mod publish;
pub mod purge;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use dag_artifact_core::application::{publish_dag, purge_dag};`

pub use bootstrap::bootstrap;
pub use inspect::{get_dag_artifact, list_dag_versions};
pub use publish::{PublishedDag, deploy_dag_version, publish_dag, publish_dag_version};
pub use purge::{purge_all_dag, purge_dag};
