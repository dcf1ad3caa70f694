use super::retention::RetentionTier;
use crate::domain::errors::ValidationError;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Seven days
pub const DAILY_WINDOW_SECONDS: i64 = 604_800;

/// 31 days, a fixed-length stand-in for "one month"
pub const WEEKLY_WINDOW_SECONDS: i64 = 2_678_400;

/// Tiered retention policy for the snapshots of one volume.
///
/// Snapshots younger than `daily_window` are kept, snapshots taken on the
/// first of a month are kept forever, and Sunday snapshots are kept while
/// younger than `weekly_window`. Calendar fields are read in UTC.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct RetentionPolicy {
    #[builder(default = Duration::seconds(DAILY_WINDOW_SECONDS))]
    pub daily_window: Duration,

    #[builder(default = Duration::seconds(WEEKLY_WINDOW_SECONDS))]
    pub weekly_window: Duration,

    /// Compute decisions but issue no mutating provider call
    #[builder(default)]
    pub dry_run: bool,

    /// Emit the per-snapshot decision trace
    #[builder(default)]
    pub verbose: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetentionPolicy {
    /// Validate the window settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (window, value) in [
            ("daily_window", self.daily_window),
            ("weekly_window", self.weekly_window),
        ] {
            if value <= Duration::zero() {
                return Err(ValidationError::NonPositiveWindow {
                    window: window.to_string(),
                    seconds: value.num_seconds(),
                });
            }
        }

        if self.weekly_window < self.daily_window {
            return Err(ValidationError::WeeklyWindowShorterThanDaily {
                daily_seconds: self.daily_window.num_seconds(),
                weekly_seconds: self.weekly_window.num_seconds(),
            });
        }

        Ok(())
    }

    /// Tier for a snapshot that is not the most recent one.
    ///
    /// Rules are checked in order and the first match wins.
    pub fn tier_for(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> RetentionTier {
        let age = now.signed_duration_since(created_at);

        if age < self.daily_window {
            RetentionTier::KeepDaily
        } else if created_at.day() == 1 {
            RetentionTier::KeepMonthly
        } else if created_at.weekday() == Weekday::Sun && age < self.weekly_window {
            RetentionTier::KeepWeekly
        } else {
            RetentionTier::Delete
        }
    }
}
