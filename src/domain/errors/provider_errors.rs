use crate::domain::value_objects::SnapshotId;

/// Errors reported by a snapshot provider
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderError {
    /// The request never produced a response (connect, timeout, TLS)
    Transport { message: String },

    /// The provider answered with an API error document
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The snapshot does not exist (anymore)
    NotFound { snapshot_id: SnapshotId },

    /// The provider response could not be decoded
    InvalidResponse { message: String },
}

impl ProviderError {
    /// Short machine-readable error code, used in reports
    pub fn code(&self) -> &str {
        match self {
            ProviderError::Transport { .. } => "Transport",
            ProviderError::Api { code, .. } => code,
            ProviderError::NotFound { .. } => "NotFound",
            ProviderError::InvalidResponse { .. } => "InvalidResponse",
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Transport { message } => {
                write!(f, "Provider transport error: {}", message)
            }
            ProviderError::Api {
                status,
                code,
                message,
            } => {
                write!(f, "Provider API error {} ({}): {}", code, status, message)
            }
            ProviderError::NotFound { snapshot_id } => {
                write!(f, "Snapshot not found: {}", snapshot_id)
            }
            ProviderError::InvalidResponse { message } => {
                write!(f, "Invalid provider response: {}", message)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
