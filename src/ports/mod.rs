pub mod provider;
pub mod services;

// Re-export all port traits for convenience
pub use provider::{Clock, FixedClock, SnapshotProvider, SystemClock};
pub use services::{CleanupReport, FailedDeletion, RetentionService, SnapshotCreation};
