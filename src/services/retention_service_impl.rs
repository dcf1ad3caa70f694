use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    domain::{
        classifier::classify,
        errors::{RetentionError, RetentionResult},
        models::{RetentionPlan, RetentionPolicy, SnapshotRecord, SnapshotStatus},
        value_objects::{SnapshotId, VolumeId},
    },
    ports::{
        provider::{Clock, SnapshotProvider, SystemClock},
        services::{CleanupReport, FailedDeletion, RetentionService, SnapshotCreation},
    },
};

/// Implementation of the RetentionService
#[derive(Clone)]
pub struct RetentionServiceImpl {
    provider: Arc<dyn SnapshotProvider>,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
    max_concurrent_deletes: usize,
}

enum DeleteOutcome {
    Deleted,
    Failed(FailedDeletion),
    Skipped(SnapshotId),
}

impl RetentionServiceImpl {
    pub fn new(provider: Arc<dyn SnapshotProvider>) -> Self {
        Self {
            provider,
            clock: Arc::new(SystemClock),
            shutdown: CancellationToken::new(),
            max_concurrent_deletes: 1,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Once `token` is cancelled no new delete request is issued
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn with_max_concurrent_deletes(mut self, limit: usize) -> Self {
        self.max_concurrent_deletes = limit.max(1);
        self
    }

    async fn list_completed(&self, volume: &VolumeId) -> RetentionResult<Vec<SnapshotRecord>> {
        self.provider
            .list_snapshots(volume, SnapshotStatus::Completed)
            .await
            .map_err(|source| RetentionError::ProviderUnavailable {
                volume: volume.clone(),
                operation: "list_snapshots".to_string(),
                source,
            })
    }

    fn trace_plan(&self, plan: &RetentionPlan, verbose: bool) {
        for decision in &plan.decisions {
            let date = decision.created_at.format("%a %d %b %Y");
            if verbose {
                info!(snapshot_id = %decision.snapshot.id, created = %date, "{}", decision.tier);
            } else {
                debug!(snapshot_id = %decision.snapshot.id, created = %date, "{}", decision.tier);
            }
        }

        for rejected in &plan.rejected {
            warn!(snapshot_id = %rejected.snapshot.id, "{}", rejected.error());
        }
    }

    /// Issue one independent delete per target; failures never stop the others
    async fn delete_all(&self, targets: Vec<SnapshotRecord>) -> Vec<DeleteOutcome> {
        stream::iter(targets)
            .map(|snapshot| {
                let provider = Arc::clone(&self.provider);
                let shutdown = self.shutdown.clone();
                async move {
                    if shutdown.is_cancelled() {
                        debug!(snapshot_id = %snapshot.id, "Cancelled, delete not issued");
                        return DeleteOutcome::Skipped(snapshot.id);
                    }

                    match provider.delete_snapshot(&snapshot.id).await {
                        Ok(()) => {
                            info!(snapshot_id = %snapshot.id, "Snapshot deleted");
                            DeleteOutcome::Deleted
                        }
                        Err(error) => {
                            warn!(snapshot_id = %snapshot.id, %error, "Failed to delete snapshot");
                            DeleteOutcome::Failed(FailedDeletion {
                                snapshot_id: snapshot.id,
                                error,
                            })
                        }
                    }
                }
            })
            .buffer_unordered(self.max_concurrent_deletes)
            .collect()
            .await
    }
}

#[async_trait]
impl RetentionService for RetentionServiceImpl {
    #[instrument(skip(self, policy), fields(volume = %volume, dry_run = policy.dry_run))]
    async fn cleanup(
        &self,
        volume: &VolumeId,
        policy: &RetentionPolicy,
    ) -> RetentionResult<CleanupReport> {
        policy.validate()?;

        let started = Instant::now();
        let now = self.clock.now();
        let snapshots = self.list_completed(volume).await?;

        // Zero or one snapshot is classified as usual; nothing can be deleted
        if snapshots.len() <= 1 {
            info!(count = snapshots.len(), "Not enough snapshots found to manage");
        }

        let plan = classify(now, &snapshots, policy);
        self.trace_plan(&plan, policy.verbose);

        let targets: Vec<SnapshotRecord> = plan.to_delete().into_iter().cloned().collect();
        let mut report = CleanupReport::empty(volume.clone(), policy.dry_run, now);
        report.kept = plan.kept_count();
        report.deleted_requested = targets.len();
        report.rejected = plan.rejected;
        report.decisions = plan.decisions;

        if policy.dry_run {
            info!(
                would_delete = report.deleted_requested,
                "No operation taken, deletions only reported"
            );
            report.duration = started.elapsed();
            return Ok(report);
        }

        for outcome in self.delete_all(targets).await {
            match outcome {
                DeleteOutcome::Deleted => report.deleted_succeeded += 1,
                DeleteOutcome::Failed(failed) => report.deleted_failed.push(failed),
                DeleteOutcome::Skipped(id) => report.skipped.push(id),
            }
        }
        report.duration = started.elapsed();

        info!(
            kept = report.kept,
            deleted = report.deleted_succeeded,
            failed = report.deleted_failed.len(),
            skipped = report.skipped.len(),
            "Snapshot management complete"
        );

        Ok(report)
    }

    #[instrument(skip(self, description), fields(volume = %volume))]
    async fn take_snapshot(
        &self,
        volume: &VolumeId,
        description: Option<&str>,
        dry_run: bool,
    ) -> RetentionResult<SnapshotCreation> {
        if dry_run {
            info!("No operation taken, snapshot not initiated");
            return Ok(SnapshotCreation::DryRun {
                volume: volume.clone(),
            });
        }

        let snapshot = self
            .provider
            .create_snapshot(volume, description)
            .await
            .map_err(|source| RetentionError::ProviderUnavailable {
                volume: volume.clone(),
                operation: "create_snapshot".to_string(),
                source,
            })?;

        info!(snapshot_id = %snapshot.id, "Snapshot initiated");
        Ok(SnapshotCreation::Created { snapshot })
    }

    #[instrument(skip(self, policy), fields(volume = %volume))]
    async fn preview(
        &self,
        volume: &VolumeId,
        policy: &RetentionPolicy,
    ) -> RetentionResult<RetentionPlan> {
        policy.validate()?;

        let snapshots = self.list_completed(volume).await?;
        let plan = classify(self.clock.now(), &snapshots, policy);
        self.trace_plan(&plan, policy.verbose);

        Ok(plan)
    }
}
