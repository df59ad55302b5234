// dag-artifact-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// ArtifactRepository, DagFolder
pub mod ports;

// 2. Domain
// Versions, dag_id rewrite, configuration. No I/O.
pub mod domain;

// 3. Infrastructure (Adapters)
// S3 + DynamoDB, local filesystem, config files.
pub mod infrastructure;

// 4. Application (Use Cases)
// publish / release / deploy / purge / bootstrap
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::DagArtifactError;
