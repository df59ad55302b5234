// dag-artifact-core/src/domain/dag/mod.rs

pub mod rewrite;
pub mod script;

pub use rewrite::{DeploymentFile, deployment_file, rewrite_dag_id};
pub use script::{DagScript, sha256_hex};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::domain::artifact::ArtifactVersion;
use crate::domain::error::DomainError;

const MAX_DAG_ID_LEN: usize = 250;

fn re_dag_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Airflow's KEY_REGEX
        Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap_or_else(|_| unreachable!())
    })
}

/// Airflow DAG identifier. Also the artifact name and the stem of every
/// deployment file, hence the strict character set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DagId(String);

impl DagId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_DAG_ID_LEN
            && re_dag_id().is_match(&raw)
            && !raw.contains("..")
            && !is_relative_path_name(&raw);
        if valid {
            Ok(Self(raw))
        } else {
            Err(DomainError::InvalidDagId(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `.` (or any dot-only name) resolves to the parent folder once joined to a path.
fn is_relative_path_name(raw: &str) -> bool {
    raw.chars().all(|c| c == '.')
}

impl fmt::Display for DagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DagId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DagId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DagId> for String {
    fn from(value: DagId) -> Self {
        value.0
    }
}

/// Which deployed copy of a DAG we are talking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DagAlias {
    Latest,
    Version(u32),
}

impl DagAlias {
    pub fn suffix(&self) -> String {
        match self {
            Self::Latest => "_latest".to_string(),
            Self::Version(n) => format!("_v{}", n),
        }
    }

    /// `etl` -> `etl_latest` / `etl_v3`
    pub fn qualify(&self, dag_id: &DagId) -> String {
        format!("{}{}", dag_id, self.suffix())
    }
}

impl From<ArtifactVersion> for DagAlias {
    fn from(version: ArtifactVersion) -> Self {
        match version {
            ArtifactVersion::Latest => Self::Latest,
            ArtifactVersion::Numbered(n) => Self::Version(n),
        }
    }
}
