use crate::domain::{
    errors::RetentionError,
    value_objects::{SnapshotId, VolumeId},
};
use chrono::{DateTime, SecondsFormat, Timelike, Utc};

/// A point-in-time snapshot of a volume, as reported by the provider
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SnapshotRecord {
    pub id: SnapshotId,
    pub volume_id: VolumeId,
    /// Creation time exactly as the provider reported it (RFC 3339)
    pub start_time: String,
    pub description: Option<String>,
    pub status: SnapshotStatus,
    /// Set when the provider reported a field that failed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect: Option<RecordDefect>,
}

/// A provider field that could not be turned into a domain value
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RecordDefect {
    pub field: String,
    pub reason: String,
}

/// Lifecycle state of a snapshot on the provider side
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SnapshotStatus {
    Pending,
    Completed,
    Error,
    Recoverable,
    Recovering,
    Other(String),
}

impl SnapshotStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SnapshotStatus::Pending => "pending",
            SnapshotStatus::Completed => "completed",
            SnapshotStatus::Error => "error",
            SnapshotStatus::Recoverable => "recoverable",
            SnapshotStatus::Recovering => "recovering",
            SnapshotStatus::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => SnapshotStatus::Pending,
            "completed" => SnapshotStatus::Completed,
            "error" => SnapshotStatus::Error,
            "recoverable" => SnapshotStatus::Recoverable,
            "recovering" => SnapshotStatus::Recovering,
            _ => SnapshotStatus::Other(s.to_string()),
        }
    }
}

impl serde::Serialize for SnapshotStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl SnapshotRecord {
    /// Build a completed snapshot record from a well-formed creation time
    pub fn new(id: SnapshotId, volume_id: VolumeId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            volume_id,
            start_time: started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            description: None,
            status: SnapshotStatus::Completed,
            defect: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: SnapshotStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_defect(mut self, field: impl Into<String>, reason: impl Into<String>) -> Self {
        self.defect = Some(RecordDefect {
            field: field.into(),
            reason: reason.into(),
        });
        self
    }

    /// Creation time in UTC, truncated to whole seconds.
    ///
    /// Fails for a record carrying a defect, whatever its start time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, RetentionError> {
        if let Some(defect) = &self.defect {
            return Err(self.malformed(&defect.field, defect.reason.clone()));
        }

        let raw = self.start_time.trim();
        if raw.is_empty() {
            return Err(self.malformed("start_time", "is empty".to_string()));
        }

        let parsed = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| {
                self.malformed(
                    "start_time",
                    format!("is not an RFC 3339 timestamp ({})", e),
                )
            })?
            .with_timezone(&Utc);

        Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
    }

    fn malformed(&self, field: &str, reason: String) -> RetentionError {
        RetentionError::MalformedInput {
            snapshot_id: self.id.clone(),
            field: field.to_string(),
            reason,
        }
    }
}
