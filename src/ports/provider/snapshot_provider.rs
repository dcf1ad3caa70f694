use crate::domain::{
    errors::ProviderResult,
    models::{SnapshotRecord, SnapshotStatus},
    value_objects::{SnapshotId, VolumeId},
};
use async_trait::async_trait;

/// Port for the cloud provider's snapshot API
/// This abstracts the actual backend (EC2, an emulator, in-memory)
#[async_trait]
pub trait SnapshotProvider: Send + Sync + 'static {
    /// List the snapshots of a volume that are in the given state
    async fn list_snapshots(
        &self,
        volume: &VolumeId,
        status: SnapshotStatus,
    ) -> ProviderResult<Vec<SnapshotRecord>>;

    /// Start a new snapshot of a volume
    async fn create_snapshot(
        &self,
        volume: &VolumeId,
        description: Option<&str>,
    ) -> ProviderResult<SnapshotRecord>;

    /// Delete a snapshot by identifier
    async fn delete_snapshot(&self, snapshot_id: &SnapshotId) -> ProviderResult<()>;
}
