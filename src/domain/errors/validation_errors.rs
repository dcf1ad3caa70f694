/// Validation errors for domain value objects and policy settings
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // VolumeId validation errors
    EmptyVolumeId,
    VolumeIdTooLong {
        actual: usize,
        max: usize,
    },
    InvalidVolumeIdCharacter(char),

    // SnapshotId validation errors
    EmptySnapshotId,
    InvalidSnapshotIdCharacter(char),

    // Region validation errors
    UnknownRegion(String),

    // Policy validation errors
    NonPositiveWindow {
        window: String,
        seconds: i64,
    },
    WeeklyWindowShorterThanDaily {
        daily_seconds: i64,
        weekly_seconds: i64,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyVolumeId => write!(f, "Volume ID cannot be empty"),
            ValidationError::VolumeIdTooLong { actual, max } => {
                write!(f, "Volume ID too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidVolumeIdCharacter(c) => {
                write!(f, "Invalid character in volume ID: {:?}", c)
            }
            ValidationError::EmptySnapshotId => write!(f, "Snapshot ID cannot be empty"),
            ValidationError::InvalidSnapshotIdCharacter(c) => {
                write!(f, "Invalid character in snapshot ID: {:?}", c)
            }
            ValidationError::UnknownRegion(region) => {
                write!(f, "Unknown region: {}", region)
            }
            ValidationError::NonPositiveWindow { window, seconds } => {
                write!(
                    f,
                    "Retention window '{}' must be positive, got {} seconds",
                    window, seconds
                )
            }
            ValidationError::WeeklyWindowShorterThanDaily {
                daily_seconds,
                weekly_seconds,
            } => {
                write!(
                    f,
                    "Weekly window ({}s) cannot be shorter than daily window ({}s)",
                    weekly_seconds, daily_seconds
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
