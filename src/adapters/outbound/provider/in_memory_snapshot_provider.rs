use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{ProviderError, ProviderResult},
        models::{SnapshotRecord, SnapshotStatus},
        value_objects::{SnapshotId, VolumeId},
    },
    ports::provider::SnapshotProvider,
};

/// In-memory implementation of SnapshotProvider for testing and development
#[derive(Clone, Default)]
pub struct InMemorySnapshotProvider {
    data: Arc<RwLock<ProviderData>>,
}

#[derive(Default)]
struct ProviderData {
    // Map of volume -> snapshots in insertion order
    snapshots: HashMap<VolumeId, Vec<SnapshotRecord>>,
    // Snapshots whose deletion is rejected with the given error
    failing_deletes: HashMap<SnapshotId, ProviderError>,
    listing_failure: Option<ProviderError>,
    calls: ProviderCalls,
}

/// Number of calls received per provider operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCalls {
    pub list: usize,
    pub create: usize,
    pub delete: usize,
}

impl ProviderCalls {
    /// Calls that change provider state
    pub fn mutations(&self) -> usize {
        self.create + self.delete
    }
}

impl InMemorySnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot as if the provider had produced it
    pub async fn insert(&self, snapshot: SnapshotRecord) {
        let mut data = self.data.write().await;
        data.snapshots
            .entry(snapshot.volume_id.clone())
            .or_default()
            .push(snapshot);
    }

    /// All stored snapshots of a volume, whatever their status
    pub async fn snapshots(&self, volume: &VolumeId) -> Vec<SnapshotRecord> {
        let data = self.data.read().await;
        data.snapshots.get(volume).cloned().unwrap_or_default()
    }

    pub async fn contains(&self, snapshot_id: &SnapshotId) -> bool {
        let data = self.data.read().await;
        data.snapshots
            .values()
            .flatten()
            .any(|s| &s.id == snapshot_id)
    }

    /// Make every delete of `snapshot_id` fail with `error`
    pub async fn fail_delete(&self, snapshot_id: SnapshotId, error: ProviderError) {
        let mut data = self.data.write().await;
        data.failing_deletes.insert(snapshot_id, error);
    }

    /// Make every listing fail with `error`
    pub async fn fail_listing(&self, error: ProviderError) {
        let mut data = self.data.write().await;
        data.listing_failure = Some(error);
    }

    pub async fn calls(&self) -> ProviderCalls {
        self.data.read().await.calls
    }
}

#[async_trait]
impl SnapshotProvider for InMemorySnapshotProvider {
    async fn list_snapshots(
        &self,
        volume: &VolumeId,
        status: SnapshotStatus,
    ) -> ProviderResult<Vec<SnapshotRecord>> {
        let mut data = self.data.write().await;
        data.calls.list += 1;

        if let Some(error) = &data.listing_failure {
            return Err(error.clone());
        }

        Ok(data
            .snapshots
            .get(volume)
            .map(|snapshots| {
                snapshots
                    .iter()
                    .filter(|s| s.status == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_snapshot(
        &self,
        volume: &VolumeId,
        description: Option<&str>,
    ) -> ProviderResult<SnapshotRecord> {
        let mut data = self.data.write().await;
        data.calls.create += 1;

        let mut snapshot = SnapshotRecord::new(SnapshotId::generate(), volume.clone(), Utc::now())
            .with_status(SnapshotStatus::Pending);
        snapshot.description = description.map(str::to_string);

        data.snapshots
            .entry(volume.clone())
            .or_default()
            .push(snapshot.clone());

        Ok(snapshot)
    }

    async fn delete_snapshot(&self, snapshot_id: &SnapshotId) -> ProviderResult<()> {
        let mut data = self.data.write().await;
        data.calls.delete += 1;

        if let Some(error) = data.failing_deletes.get(snapshot_id) {
            return Err(error.clone());
        }

        for snapshots in data.snapshots.values_mut() {
            if let Some(pos) = snapshots.iter().position(|s| &s.id == snapshot_id) {
                snapshots.remove(pos);
                return Ok(());
            }
        }

        Err(ProviderError::NotFound {
            snapshot_id: snapshot_id.clone(),
        })
    }
}
