// dag-artifact-core/src/domain/dag/script.rs

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::domain::artifact::SCRIPT_SHA256_KEY;

/// Lowercase hex SHA-256.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// DAG script bytes as read from disk, with their content hash.
#[derive(Debug, Clone)]
pub struct DagScript {
    pub content: Vec<u8>,
    pub sha256: String,
}

impl DagScript {
    pub fn from_bytes(content: Vec<u8>) -> Self {
        let sha256 = sha256_hex(&content);
        Self { content, sha256 }
    }

    /// Object metadata for the store: the script hash plus caller entries.
    /// The hash key cannot be overridden.
    pub fn metadata(&self, extra: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut final_metadata = extra.clone();
        final_metadata.insert(SCRIPT_SHA256_KEY.to_string(), self.sha256.clone());
        final_metadata
    }
}
