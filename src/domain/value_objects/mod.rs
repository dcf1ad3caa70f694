mod region;
mod snapshot_id;
mod volume_id;

pub use region::Region;
pub use snapshot_id::SnapshotId;
pub use volume_id::VolumeId;
