// dag-artifact-core/src/domain/artifact/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// Name of the mutable slot, also used as its storage key stem.
pub const LATEST_VERSION: &str = "LATEST";

/// Metadata key always recorded by `put_artifact`.
pub const SCRIPT_SHA256_KEY: &str = "airflow_dag_script_sha256";

/// Every DAG artifact is a Python script.
pub const ARTIFACT_SUFFIX: &str = ".py";

/// Either the mutable `LATEST` slot or an immutable numbered snapshot.
///
/// Ordering puts `Latest` above every number, so sorting descending lists
/// the mutable slot first and then versions from newest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactVersion {
    Numbered(u32),
    Latest,
}

impl ArtifactVersion {
    /// Storage form: `LATEST` or a 6-digit zero-padded number.
    pub fn encode(&self) -> String {
        match self {
            Self::Latest => LATEST_VERSION.to_string(),
            Self::Numbered(n) => format!("{:06}", n),
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Fails once the numbering space is exhausted.
    pub fn next(&self) -> Result<Self, DomainError> {
        match self {
            Self::Latest => Ok(Self::Numbered(1)),
            Self::Numbered(n) => n
                .checked_add(1)
                .map(Self::Numbered)
                .ok_or_else(|| DomainError::InvalidVersion(format!("{} + 1", n))),
        }
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "{}", LATEST_VERSION),
            Self::Numbered(n) => write!(f, "{}", n),
        }
    }
}

impl std::str::FromStr for ArtifactVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(LATEST_VERSION) {
            return Ok(Self::Latest);
        }
        match trimmed.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self::Numbered(n)),
            _ => Err(DomainError::InvalidVersion(s.to_string())),
        }
    }
}

impl Serialize for ArtifactVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for ArtifactVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored blob of DAG script text, as reported by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub version: ArtifactVersion,
    /// `s3://bucket/key` for the AWS backend, a filesystem path for the local one.
    pub uri: String,
    pub sha256: String,
    pub update_at: DateTime<Utc>,
}

/// What the metadata table stores per `(name, version)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub version: ArtifactVersion,
    pub sha256: String,
    pub update_at: DateTime<Utc>,
}

impl ArtifactRecord {
    pub fn into_artifact(self, uri: String) -> Artifact {
        Artifact {
            name: self.name,
            version: self.version,
            uri,
            sha256: self.sha256,
            update_at: self.update_at,
        }
    }
}

/// Version to create when snapshotting LATEST, or `None` when the newest
/// existing version already holds the same content.
///
/// `records` may be in any order and may include the LATEST record.
pub fn next_version(
    latest: &ArtifactRecord,
    records: &[ArtifactRecord],
) -> Result<Option<ArtifactVersion>, DomainError> {
    let newest = records
        .iter()
        .filter(|r| !r.version.is_latest())
        .max_by_key(|r| r.version);
    match newest {
        Some(r) if r.sha256 == latest.sha256 => Ok(None),
        Some(r) => r.version.next().map(Some),
        None => Ok(Some(ArtifactVersion::Numbered(1))),
    }
}

/// `<prefix>/<name>/<LATEST|000001>.py`, with empty prefix segments dropped.
pub fn artifact_key(prefix: &str, name: &str, version: ArtifactVersion) -> String {
    let file_name = format!("{}{}", version.encode(), ARTIFACT_SUFFIX);
    [prefix.trim_matches('/'), name, file_name.as_str()]
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Folder holding every version of one artifact (trailing slash included).
pub fn artifact_dir_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/", name)
    } else {
        format!("{}/{}/", prefix, name)
    }
}
