mod clock;
mod snapshot_provider;

pub use clock::{Clock, FixedClock, SystemClock};
pub use snapshot_provider::SnapshotProvider;
