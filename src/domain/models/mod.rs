pub mod policy;
pub mod retention;
pub mod snapshot;

pub use policy::{DAILY_WINDOW_SECONDS, RetentionPolicy, WEEKLY_WINDOW_SECONDS};
pub use retention::{RejectedSnapshot, RetentionDecision, RetentionPlan, RetentionTier};
pub use snapshot::{RecordDefect, SnapshotRecord, SnapshotStatus};
