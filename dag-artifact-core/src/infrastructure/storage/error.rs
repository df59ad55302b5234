// dag-artifact-core/src/infrastructure/storage/error.rs

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

/// Errors raised while talking to S3 or DynamoDB.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The requested object, bucket or table was not found (HTTP 404).
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// Access denied (HTTP 403).
    #[error("Access denied to '{resource}'")]
    AccessDenied { resource: String },

    /// Failed to reach the endpoint (IO error or timeout).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Invalid or unsupported configuration (bad URI, builder error...).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Stored data could not be decoded.
    #[error("Corrupted record: {0}")]
    CorruptedRecord(String),

    #[error("S3 error: {0}")]
    S3Error(String),

    #[error("DynamoDB error: {0}")]
    DynamoDbError(String),
}

impl StorageError {
    /// A short, actionable hint for CLI output.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => {
                "The object may have been purged or never published. \
                 Check the dag_id and version."
            }
            Self::AccessDenied { .. } => {
                "Check that your AWS credentials are set and allowed to use this bucket/table."
            }
            Self::ConnectionError(_) => {
                "Check the region / endpoint_url in dag_artifact.yaml and your network."
            }
            Self::ConfigurationError(_) => "Check dag_artifact.yaml.",
            Self::CorruptedRecord(_) => {
                "A metadata record does not have the expected shape. \
                 It may have been written by another tool."
            }
            Self::S3Error(_) | Self::DynamoDbError(_) => {
                "Have you run 'dag-artifact bootstrap'?"
            }
        }
    }

    #[must_use]
    pub fn display_rich(&self) -> String {
        format!("Error: {}\n\nSuggestion:\n  {}", self, self.suggestion())
    }
}

/// Which service an SDK error came from, for the catch-all variant.
#[derive(Debug, Clone, Copy)]
pub enum Service {
    S3,
    DynamoDb,
}

/// Maps any AWS SDK error to `StorageError`, using the HTTP status first.
pub fn map_sdk_error<E>(
    err: &SdkError<E, HttpResponse>,
    service: Service,
    key: &str,
) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(service_err) => match service_err.raw().status().as_u16() {
            404 => {
                return StorageError::NotFound {
                    key: key.to_string(),
                };
            }
            403 => {
                return StorageError::AccessDenied {
                    resource: key.to_string(),
                };
            }
            _ => {}
        },
        SdkError::DispatchFailure(dispatch_err) => {
            if dispatch_err.is_io() || dispatch_err.is_timeout() {
                return StorageError::ConnectionError(DisplayErrorContext(err).to_string());
            }
        }
        SdkError::TimeoutError(_) => {
            return StorageError::ConnectionError(DisplayErrorContext(err).to_string());
        }
        _ => {}
    }
    let message = DisplayErrorContext(err).to_string();
    match service {
        Service::S3 => StorageError::S3Error(message),
        Service::DynamoDb => StorageError::DynamoDbError(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rich_display_includes_suggestion() {
        let err = StorageError::NotFound {
            key: "p/dag1/LATEST.py".to_string(),
        };
        let rich = err.display_rich();
        assert!(rich.starts_with("Error: Object not found: p/dag1/LATEST.py"));
        assert!(rich.contains("purged"));
    }
}
