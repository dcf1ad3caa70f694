use super::{ProviderError, ValidationError};
use crate::domain::value_objects::{SnapshotId, VolumeId};

/// Errors specific to retention management operations
#[derive(Debug, Clone, PartialEq)]
pub enum RetentionError {
    /// Missing or invalid required input, reported before any provider call
    Configuration { message: String },

    /// The provider could not serve a request that the pass depends on
    ProviderUnavailable {
        volume: VolumeId,
        operation: String,
        source: ProviderError,
    },

    /// A snapshot record carries a value the classifier cannot interpret
    MalformedInput {
        snapshot_id: SnapshotId,
        field: String,
        reason: String,
    },
}

impl std::fmt::Display for RetentionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetentionError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            RetentionError::ProviderUnavailable {
                volume,
                operation,
                source,
            } => {
                write!(
                    f,
                    "Provider unavailable during '{}' for volume {}: {}",
                    operation, volume, source
                )
            }
            RetentionError::MalformedInput {
                snapshot_id,
                field,
                reason,
            } => {
                write!(
                    f,
                    "Malformed snapshot '{}': field '{}' {}",
                    snapshot_id, field, reason
                )
            }
        }
    }
}

impl std::error::Error for RetentionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetentionError::ProviderUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for RetentionError {
    fn from(err: ValidationError) -> Self {
        RetentionError::Configuration {
            message: err.to_string(),
        }
    }
}

/// Result type for retention operations
pub type RetentionResult<T> = Result<T, RetentionError>;
