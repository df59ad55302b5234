pub mod project;

pub use crate::domain::project::DagArtifactConfig;
pub use project::{apply_overrides, load_project_config};
