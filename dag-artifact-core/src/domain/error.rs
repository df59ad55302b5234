// dag-artifact-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Expected dag_id literal not found in DAG script: {expected}")]
    #[diagnostic(
        code(dag_artifact::domain::dag_id_literal),
        help(
            "The script must declare `dag_id = \"{dag_id}\"` exactly once per DAG. \
             Was it already renamed (e.g. '{dag_id}_latest')?"
        )
    )]
    DagIdLiteralNotFound { dag_id: String, expected: String },

    #[error("Invalid dag_id '{0}'")]
    #[diagnostic(
        code(dag_artifact::domain::dag_id),
        help("A dag_id is 1-250 characters of letters, digits, '_', '-' or '.'.")
    )]
    InvalidDagId(String),

    #[error("Invalid artifact version '{0}'")]
    #[diagnostic(
        code(dag_artifact::domain::version),
        help("Use 'LATEST' or a positive integer such as 3 or 000003.")
    )]
    InvalidVersion(String),

    #[error("Artifact '{name}' version {version} not found")]
    #[diagnostic(code(dag_artifact::domain::artifact_not_found))]
    ArtifactNotFound { name: String, version: String },
}
