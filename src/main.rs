//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `client_metadata` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing the collected record as JSON
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use client_metadata::initialization::init_logger_with;
use client_metadata::{LogFormat, LogLevel, MetadataCollector, MetadataConfig, StaticEnvironment};

/// Collect user-agent, fingerprint and location metadata as JSON.
#[derive(Debug, Parser)]
#[command(name = "client_metadata", version)]
struct Cli {
    /// User-Agent string to classify (ignored with --environment)
    #[arg(
        long,
        default_value = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
    )]
    user_agent: String,

    /// JSON environment snapshot to collect from instead of the host
    #[arg(long)]
    environment: Option<PathBuf>,

    /// Resolve IP geolocation
    #[arg(long)]
    include_location: bool,

    /// Skip fingerprint generation
    #[arg(long)]
    no_fingerprint: bool,

    /// Include canvas, WebGL and font probes in the fingerprint
    #[arg(long)]
    comprehensive: bool,

    /// Overall location timeout in milliseconds
    #[arg(long, default_value_t = client_metadata::config::DEFAULT_LOCATION_TIMEOUT_MS)]
    location_timeout_ms: u64,

    /// Per-provider timeout in milliseconds
    #[arg(long, default_value_t = client_metadata::config::DEFAULT_PROVIDER_TIMEOUT_MS)]
    provider_timeout_ms: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,
}

impl Cli {
    fn metadata_config(&self) -> MetadataConfig {
        MetadataConfig {
            include_location: self.include_location,
            include_fingerprint: !self.no_fingerprint,
            location_timeout_ms: self.location_timeout_ms,
            provider_timeout_ms: self.provider_timeout_ms,
            comprehensive_fingerprint: self.comprehensive,
        }
    }

    fn environment(&self) -> Result<StaticEnvironment> {
        match &self.environment {
            Some(path) => StaticEnvironment::from_json_file(path),
            None => Ok(StaticEnvironment::from_host(self.user_agent.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = cli.metadata_config();
    config.validate().context("Invalid configuration")?;
    let env = cli.environment()?;

    let collector = MetadataCollector::new(Arc::new(env));
    match collector.collect(&config).await {
        Ok(metadata) => {
            let json = serde_json::to_string_pretty(&metadata)
                .context("Failed to serialize metadata")?;
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            eprintln!("client_metadata error: {:#}", e);
            process::exit(1);
        }
    }
}
