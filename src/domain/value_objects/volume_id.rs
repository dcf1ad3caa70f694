use crate::domain::errors::ValidationError;

/// Identifier of the storage volume whose snapshots are managed
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct VolumeId(String);

impl VolumeId {
    const MAX_LEN: usize = 255;

    /// Create a new VolumeId with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyVolumeId);
        }

        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::VolumeIdTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ValidationError::InvalidVolumeIdCharacter(c));
        }

        Ok(Self(value))
    }

    /// Get the volume ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VolumeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VolumeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_volume_id() {
        assert!(VolumeId::new("vol-11a22222".to_string()).is_ok());
        assert!(VolumeId::new("vol-0123456789abcdef0".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_volume_id() {
        assert_eq!(
            VolumeId::new("".to_string()),
            Err(ValidationError::EmptyVolumeId)
        );
        assert_eq!(
            VolumeId::new("vol 1".to_string()),
            Err(ValidationError::InvalidVolumeIdCharacter(' '))
        );
        assert!(VolumeId::new("v".repeat(256)).is_err());
    }
}
