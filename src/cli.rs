//! Command-line plumbing shared by the `zfrontier-posts` and
//! `zfrontier-comments` binaries
//!
//! Both binaries take the same credential and logging flags; each adds its
//! own optional extras on top through `#[command(flatten)]`.

use crate::api::Credentials;
use crate::config::{load_config_or_default, Config};
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Flags every entry point accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Mobile number for login
    #[arg(long)]
    pub mobile: String,

    /// Password for login
    #[arg(long)]
    pub password: String,

    /// Console logging level (debug.log always records DEBUG)
    #[arg(long, value_enum, default_value_t = LogLevel::Info, ignore_case = true)]
    pub log_level: LogLevel,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.mobile.clone(), self.password.clone())
    }

    /// Loads the configuration and installs logging
    ///
    /// A configuration problem is the only failure that reaches the caller;
    /// crawl failures are logged by the binaries instead.
    pub fn init(&self) -> anyhow::Result<Config> {
        let config = load_config_or_default(self.config.as_deref())
            .context("Failed to load configuration")?;

        setup_logging(self.log_level, &config.output.log_file)?;

        if let Some(path) = &self.config {
            tracing::info!("Configuration loaded from: {}", path.display());
        }

        Ok(config)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    fn console_filter(self) -> EnvFilter {
        match self {
            Self::Debug => EnvFilter::new("zfrontier_crawler=debug,info"),
            Self::Info => EnvFilter::new("info"),
            Self::Warning => EnvFilter::new("warn"),
            // tracing has no level above ERROR
            Self::Error | Self::Critical => EnvFilter::new("error"),
        }
    }
}

/// Sets up console logging at the chosen level plus a DEBUG log file
///
/// `RUST_LOG` overrides the console level when set.
pub fn setup_logging(level: LogLevel, log_file: &Path) -> anyhow::Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level.console_filter());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new("zfrontier_crawler=debug,info")),
        )
        .init();

    Ok(())
}
