//! CLI argument parsing using `clap`.
//!
//! Every flag can also be supplied through an environment variable, which is
//! how the reloader is usually configured when running as a sidecar.

use crate::core::ReloaderBuilder;
use crate::duration::parse_duration;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for `config-reloader`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "config-reloader",
    version,
    about = "Reloads configuration by calling a webhook when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Config file or directory watched by the reloader.
    #[arg(long, env = "CONFIG", value_name = "PATH")]
    pub config: PathBuf,

    /// Webhook URL to send the reload POST to.
    #[arg(long = "webhook-url", env = "RELOAD_URL", value_name = "URL")]
    pub webhook_url: String,

    /// How often to re-check the config even without filesystem events.
    #[arg(
        long = "watch-interval",
        env = "WATCH_INTERVAL",
        value_name = "DURATION",
        default_value = "3m",
        value_parser = parse_duration
    )]
    pub watch_interval: Duration,

    /// Timeout for each reload request.
    #[arg(
        long = "request-timeout",
        env = "REQUEST_TIMEOUT",
        value_name = "DURATION",
        default_value = "30s",
        value_parser = parse_duration
    )]
    pub request_timeout: Duration,

    /// Log level.
    #[arg(long = "log.level", env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format.
    #[arg(long = "log.format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Builder pre-populated from the parsed arguments.
    pub fn reloader_builder(&self) -> ReloaderBuilder {
        ReloaderBuilder::new()
            .with_target(&self.config)
            .with_reload_url(&self.webhook_url)
            .with_watch_interval(self.watch_interval)
            .with_request_timeout(self.request_timeout)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Per-cycle detail
    Debug,
    /// Everything
    Trace,
}

/// Log output format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text lines
    Text,
    /// One JSON object per line
    Json,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
