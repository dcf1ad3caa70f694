pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Classifier
    classify,
    // Errors
    DomainValidationError,
    ProviderError,
    // Value objects
    Region,
    RejectedSnapshot,
    RetentionDecision,
    RetentionError,
    RetentionPlan,
    // Models
    RetentionPolicy,
    RetentionTier,
    SnapshotId,
    SnapshotRecord,
    SnapshotStatus,
    VolumeId,
};

// Port types - interfaces for external systems
pub use ports::{
    CleanupReport,
    // Clock port
    Clock,
    FailedDeletion,
    FixedClock,
    // Service ports
    RetentionService,
    SnapshotCreation,
    // Provider ports
    SnapshotProvider,
    SystemClock,
};

// Service implementations - business logic
pub use services::RetentionServiceImpl;

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppError, AppServices, ProviderBackend, create_ec2_app,
    create_in_memory_app,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::provider::{
    Ec2Config, Ec2SnapshotProvider, InMemorySnapshotProvider, ProviderCalls,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppServices, CleanupReport, Ec2SnapshotProvider, InMemorySnapshotProvider,
        RetentionPolicy, RetentionService, RetentionServiceImpl, RetentionTier, SnapshotId,
        SnapshotProvider, SnapshotRecord, VolumeId, classify, create_in_memory_app,
    };
}
