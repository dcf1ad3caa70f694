use crate::domain::errors::ValidationError;

/// Opaque, provider-assigned snapshot identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Create a new SnapshotId with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptySnapshotId);
        }

        if let Some(c) = value.chars().find(|c| c.is_whitespace()) {
            return Err(ValidationError::InvalidSnapshotIdCharacter(c));
        }

        Ok(Self(value))
    }

    /// Generate a new EC2-style identifier (`snap-` followed by 17 hex digits)
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("snap-{}", &hex[..17]))
    }

    /// Keep an identifier that failed validation, so the record carrying it
    /// can still be reported. Such ids are never sent back to a provider.
    pub(crate) fn unchecked(value: String) -> Self {
        Self(value)
    }

    /// Get the snapshot ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
