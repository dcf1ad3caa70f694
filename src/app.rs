use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    adapters::outbound::provider::{Ec2Config, Ec2SnapshotProvider, InMemorySnapshotProvider},
    domain::value_objects::Region,
    ports::provider::{Clock, SnapshotProvider, SystemClock},
    services::RetentionServiceImpl,
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider_backend: ProviderBackend,
    pub max_concurrent_deletes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_backend: ProviderBackend::InMemory,
            max_concurrent_deletes: 1,
        }
    }
}

/// Snapshot provider backend configuration
#[derive(Debug, Clone)]
pub enum ProviderBackend {
    InMemory,
    Ec2(Ec2Config),
}

/// Application services container
pub struct AppServices {
    pub retention_service: RetentionServiceImpl,
    /// Set when the in-memory backend is used, for seeding and inspection
    pub in_memory_provider: Option<InMemorySnapshotProvider>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            clock: Arc::new(SystemClock),
            shutdown: CancellationToken::new(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure provider backend
    pub fn with_provider_backend(mut self, backend: ProviderBackend) -> Self {
        self.config.provider_backend = backend;
        self
    }

    pub fn with_max_concurrent_deletes(mut self, limit: usize) -> Self {
        self.config.max_concurrent_deletes = limit;
        self
    }

    /// Replace the wall clock used to age snapshots
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Token that stops a running cleanup from issuing further deletes
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        if self.config.max_concurrent_deletes == 0 {
            return Err(AppError::Configuration {
                message: "max_concurrent_deletes must be at least 1".to_string(),
            });
        }

        let (provider, in_memory_provider) = self.create_provider()?;

        let retention_service = RetentionServiceImpl::new(provider)
            .with_clock(self.clock.clone())
            .with_cancellation(self.shutdown.clone())
            .with_max_concurrent_deletes(self.config.max_concurrent_deletes);

        Ok(AppServices {
            retention_service,
            in_memory_provider,
        })
    }

    /// Create the snapshot provider based on configuration
    fn create_provider(
        &self,
    ) -> Result<(Arc<dyn SnapshotProvider>, Option<InMemorySnapshotProvider>), AppError> {
        match &self.config.provider_backend {
            ProviderBackend::InMemory => {
                let provider = InMemorySnapshotProvider::new();
                Ok((Arc::new(provider.clone()), Some(provider)))
            }
            ProviderBackend::Ec2(config) => {
                let provider = Ec2SnapshotProvider::new(config.clone()).map_err(|e| {
                    AppError::ProviderInit {
                        message: e.to_string(),
                    }
                })?;
                Ok((Arc::new(provider), None))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Provider initialization error: {message}")]
    ProviderInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_provider_backend(ProviderBackend::InMemory)
        .build()
}

/// Create an EC2-backed application
pub fn create_ec2_app(region: Region, endpoint: Option<String>) -> Result<AppServices, AppError> {
    let mut config = Ec2Config::new(region);
    config.endpoint = endpoint;

    AppBuilder::new()
        .with_provider_backend(ProviderBackend::Ec2(config))
        .build()
}
