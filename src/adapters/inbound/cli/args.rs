use clap::{Parser, Subcommand, ValueEnum};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::{
    adapters::outbound::provider::Ec2Config,
    app::{AppConfig, ProviderBackend},
    domain::{
        errors::RetentionError,
        models::RetentionPolicy,
        value_objects::{Region, VolumeId},
    },
};

#[derive(Parser, Debug)]
#[command(name = "snapshot-manager")]
#[command(about = "Keeps daily, weekly and monthly snapshots of a volume and deletes the rest", long_about = None)]
pub struct Cli {
    /// Volume ID whose snapshots are managed
    #[arg(short = 'v', long, env = "SNAPSHOT_VOLUME_ID", global = true)]
    pub volume: Option<String>,

    /// Region holding the snapshots (short aliases like apac-se1 accepted)
    #[arg(short, long, env = "EC2_REGION", default_value = Region::DEFAULT_CODE, global = true)]
    pub region: String,

    /// No output at all
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print the settings and every per-snapshot decision
    #[arg(short = 'o', long, global = true)]
    pub verbose: bool,

    /// Compute decisions without creating or deleting anything
    #[arg(short = 'n', long = "no-operation", visible_alias = "dry-run", global = true)]
    pub no_operation: bool,

    /// Description for newly taken snapshots
    #[arg(short, long, global = true)]
    pub description: Option<String>,

    /// Snapshot provider backend
    #[arg(long, env = "SNAPSHOT_BACKEND", value_enum, default_value_t = Backend::Ec2, global = true)]
    pub backend: Backend,

    /// EC2 Query API endpoint, defaults to the regional endpoint
    #[arg(long, env = "EC2_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Upper bound on delete requests in flight
    #[arg(long, env = "MAX_CONCURRENT_DELETES", default_value_t = 1, global = true)]
    pub max_concurrent_deletes: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Log level for diagnostics on stderr
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Delete snapshots the retention policy no longer covers (default)
    Cleanup,
    /// Take a new snapshot of the volume
    Snapshot,
    /// Take a new snapshot, then clean up
    Backup,
    /// Show what a cleanup would keep and delete
    Plan,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Ec2,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Cleanup)
    }

    /// The managed volume; its absence is a configuration error
    pub fn volume_id(&self) -> Result<VolumeId, RetentionError> {
        let raw = self
            .volume
            .as_deref()
            .ok_or_else(|| RetentionError::Configuration {
                message: "EC2 Volume ID required".to_string(),
            })?;

        Ok(VolumeId::new(raw.to_string())?)
    }

    pub fn region(&self) -> Result<Region, RetentionError> {
        Ok(Region::parse(&self.region)?)
    }

    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy::builder()
            .dry_run(self.no_operation)
            .verbose(self.verbose && !self.quiet)
            .build()
    }

    pub fn to_app_config(&self) -> Result<AppConfig, RetentionError> {
        let provider_backend = match self.backend {
            Backend::Memory => ProviderBackend::InMemory,
            Backend::Ec2 => {
                let mut config = Ec2Config::new(self.region()?);
                config.endpoint = self.endpoint.clone();
                ProviderBackend::Ec2(config)
            }
        };

        if self.max_concurrent_deletes == 0 {
            return Err(RetentionError::Configuration {
                message: "--max-concurrent-deletes must be at least 1".to_string(),
            });
        }

        Ok(AppConfig {
            provider_backend,
            max_concurrent_deletes: self.max_concurrent_deletes,
        })
    }

    /// Maximum level for the diagnostics subscriber
    pub fn log_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::OFF;
        }

        let level = LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::WARN);
        if self.verbose {
            level.max(LevelFilter::INFO)
        } else {
            level
        }
    }
}
