pub mod ec2;
mod in_memory_snapshot_provider;

pub use ec2::{Ec2Config, Ec2SnapshotProvider};
pub use in_memory_snapshot_provider::{InMemorySnapshotProvider, ProviderCalls};
