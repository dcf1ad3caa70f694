//! EC2 snapshot provider
//!
//! Talks to the EC2 Query API (DescribeSnapshots, CreateSnapshot,
//! DeleteSnapshot) with reqwest and decodes the XML responses with quick-xml.

mod ec2_provider;
mod responses;

pub use ec2_provider::{Ec2Config, Ec2SnapshotProvider};
