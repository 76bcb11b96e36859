//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::state::Settings;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "shrink-timer")]
#[command(about = "A shrinking countdown timer with persisted state and an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding settings.json and timerState.json
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Default countdown length in seconds (overrides settings.json)
    #[arg(long)]
    pub duration: Option<u64>,

    /// Interval between display updates in milliseconds
    #[arg(long, default_value = "16", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Shell command to run each time the countdown completes
    #[arg(long)]
    pub on_complete: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// `--duration` in milliseconds, if given
    pub fn duration_override(&self) -> Option<u64> {
        self.duration.map(|seconds| seconds.saturating_mul(1000))
    }

    /// Default countdown length for this run: the flag wins over `settings`
    pub fn default_duration(&self, settings: &Settings) -> u64 {
        self.duration_override().unwrap_or(settings.default_duration)
    }
}
