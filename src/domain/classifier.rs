//! Pure retention classification.
//!
//! [`classify`] never performs I/O and never mutates its input. The most
//! recent snapshot is decided first and taken out of the pool; every other
//! snapshot is judged on its own age and calendar fields through
//! [`RetentionPolicy::tier_for`].

use crate::domain::{
    errors::RetentionError,
    models::{
        RejectedSnapshot, RetentionDecision, RetentionPlan, RetentionPolicy, RetentionTier,
        SnapshotRecord,
    },
};
use chrono::{DateTime, Utc};

/// Classify the snapshots of one volume at instant `now`.
///
/// Records whose creation time cannot be parsed are rejected individually
/// and take no part in the most-recent selection. When several records
/// share the latest creation time, the first one in input order is the
/// most recent.
pub fn classify(
    now: DateTime<Utc>,
    snapshots: &[SnapshotRecord],
    policy: &RetentionPolicy,
) -> RetentionPlan {
    let mut plan = RetentionPlan::default();
    let mut parsed = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        match snapshot.created_at() {
            Ok(created_at) => parsed.push((snapshot, created_at)),
            Err(RetentionError::MalformedInput { field, reason, .. }) => {
                plan.rejected.push(RejectedSnapshot {
                    snapshot: snapshot.clone(),
                    field,
                    reason,
                });
            }
            Err(other) => {
                plan.rejected.push(RejectedSnapshot {
                    snapshot: snapshot.clone(),
                    field: "start_time".to_string(),
                    reason: other.to_string(),
                });
            }
        }
    }

    let Some(most_recent) = index_of_latest(&parsed) else {
        return plan;
    };

    plan.decisions = parsed
        .into_iter()
        .enumerate()
        .map(|(index, (snapshot, created_at))| {
            let tier = if index == most_recent {
                RetentionTier::KeepMostRecent
            } else {
                policy.tier_for(created_at, now)
            };

            RetentionDecision {
                snapshot: snapshot.clone(),
                created_at,
                tier,
            }
        })
        .collect();

    plan
}

/// Position of the latest creation time, first occurrence on ties
fn index_of_latest(parsed: &[(&SnapshotRecord, DateTime<Utc>)]) -> Option<usize> {
    let mut latest: Option<(usize, DateTime<Utc>)> = None;

    for (index, (_, created_at)) in parsed.iter().enumerate() {
        match latest {
            Some((_, best)) if *created_at <= best => {}
            _ => latest = Some((index, *created_at)),
        }
    }

    latest.map(|(index, _)| index)
}
