use crate::domain::{
    errors::{ProviderError, RetentionResult},
    models::{RejectedSnapshot, RetentionDecision, RetentionPlan, RetentionPolicy, SnapshotRecord},
    value_objects::{SnapshotId, VolumeId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Service port for snapshot retention operations
#[async_trait]
pub trait RetentionService: Send + Sync + 'static {
    /// Run one cleanup pass for a volume
    async fn cleanup(
        &self,
        volume: &VolumeId,
        policy: &RetentionPolicy,
    ) -> RetentionResult<CleanupReport>;

    /// Take a new snapshot of a volume
    async fn take_snapshot(
        &self,
        volume: &VolumeId,
        description: Option<&str>,
        dry_run: bool,
    ) -> RetentionResult<SnapshotCreation>;

    /// List and classify without touching anything
    async fn preview(
        &self,
        volume: &VolumeId,
        policy: &RetentionPolicy,
    ) -> RetentionResult<RetentionPlan>;
}

/// Results from one cleanup pass
#[derive(Debug, Clone, serde::Serialize)]
pub struct CleanupReport {
    pub volume: VolumeId,
    pub dry_run: bool,
    pub kept: usize,
    pub deleted_requested: usize,
    pub deleted_succeeded: usize,
    pub deleted_failed: Vec<FailedDeletion>,
    /// Deletions never issued because the pass was cancelled
    pub skipped: Vec<SnapshotId>,
    pub rejected: Vec<RejectedSnapshot>,
    pub decisions: Vec<RetentionDecision>,
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_duration_ms")]
    pub duration: std::time::Duration,
}

impl CleanupReport {
    /// Report with nothing kept or deleted yet
    pub fn empty(volume: VolumeId, dry_run: bool, started_at: DateTime<Utc>) -> Self {
        Self {
            volume,
            dry_run,
            kept: 0,
            deleted_requested: 0,
            deleted_succeeded: 0,
            deleted_failed: Vec::new(),
            skipped: Vec::new(),
            rejected: Vec::new(),
            decisions: Vec::new(),
            started_at,
            duration: std::time::Duration::ZERO,
        }
    }

    /// True when every requested deletion went through
    pub fn is_complete(&self) -> bool {
        self.dry_run || (self.deleted_failed.is_empty() && self.skipped.is_empty())
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FailedDeletion {
    pub snapshot_id: SnapshotId,
    pub error: ProviderError,
}

/// Outcome of a snapshot request
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SnapshotCreation {
    Created { snapshot: SnapshotRecord },
    DryRun { volume: VolumeId },
}

fn serialize_duration_ms<S: serde::Serializer>(
    duration: &std::time::Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
