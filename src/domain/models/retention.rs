use super::snapshot::SnapshotRecord;
use crate::domain::{errors::RetentionError, value_objects::SnapshotId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Retention tier assigned to a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionTier {
    KeepMostRecent,
    KeepDaily,
    KeepMonthly,
    KeepWeekly,
    Delete,
}

impl RetentionTier {
    pub fn is_kept(&self) -> bool {
        !matches!(self, RetentionTier::Delete)
    }

    /// Human readable reason for the decision
    pub fn reason(&self) -> &'static str {
        match self {
            RetentionTier::KeepMostRecent => "Keep most recent snapshot",
            RetentionTier::KeepDaily => "Keep daily snapshot",
            RetentionTier::KeepMonthly => "Keep monthly snapshot",
            RetentionTier::KeepWeekly => "Keep weekly snapshot",
            RetentionTier::Delete => "Delete snapshot",
        }
    }
}

impl std::fmt::Display for RetentionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// The tier decided for one well-formed snapshot
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RetentionDecision {
    pub snapshot: SnapshotRecord,
    pub created_at: DateTime<Utc>,
    pub tier: RetentionTier,
}

/// A snapshot the classifier refused to assign a tier to
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RejectedSnapshot {
    pub snapshot: SnapshotRecord,
    pub field: String,
    pub reason: String,
}

impl RejectedSnapshot {
    pub fn error(&self) -> RetentionError {
        RetentionError::MalformedInput {
            snapshot_id: self.snapshot.id.clone(),
            field: self.field.clone(),
            reason: self.reason.clone(),
        }
    }
}

/// Outcome of classifying a set of snapshots
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RetentionPlan {
    /// One entry per well-formed input record, in input order
    pub decisions: Vec<RetentionDecision>,
    pub rejected: Vec<RejectedSnapshot>,
}

impl RetentionPlan {
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty() && self.rejected.is_empty()
    }

    pub fn most_recent(&self) -> Option<&RetentionDecision> {
        self.decisions
            .iter()
            .find(|d| d.tier == RetentionTier::KeepMostRecent)
    }

    pub fn kept(&self) -> impl Iterator<Item = &RetentionDecision> {
        self.decisions.iter().filter(|d| d.tier.is_kept())
    }

    /// Number of distinct identifiers kept
    pub fn kept_count(&self) -> usize {
        self.kept()
            .map(|d| &d.snapshot.id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Snapshots to delete, at most once per identifier.
    ///
    /// An identifier that is also kept by another decision is never returned.
    pub fn to_delete(&self) -> Vec<&SnapshotRecord> {
        let kept: HashSet<&SnapshotId> = self.kept().map(|d| &d.snapshot.id).collect();
        let mut seen = HashSet::new();

        self.decisions
            .iter()
            .filter(|d| d.tier == RetentionTier::Delete)
            .map(|d| &d.snapshot)
            .filter(|s| !kept.contains(&s.id) && seen.insert(&s.id))
            .collect()
    }

    pub fn tier_of(&self, id: &SnapshotId) -> Option<RetentionTier> {
        self.decisions
            .iter()
            .find(|d| &d.snapshot.id == id)
            .map(|d| d.tier)
    }
}
