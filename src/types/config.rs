//! Configuration structures for the cron load analyzer
//!
//! This module contains the command line surface, the optional JSON config
//! file layer and the validated analyzer configuration.

use super::OutputFormat;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration values
pub mod defaults {
    /// Simulated window length when no `WINDOW_DAYS` argument is given
    pub const WINDOW_DAYS: u64 = 7;

    /// Window start epoch (2000-01-01T00:00:00Z)
    pub const WINDOW_START_UNIX: i64 = 946_684_800;

    /// Directory receiving the results file
    pub const OUTPUT_DIR: &str = "/var/tmp";

    /// Results file name prefix; the process start time is appended
    pub const RESULTS_FILE_PREFIX: &str = "cron_load_analysis";

    /// Number of ranked rows shown in the terminal summary
    pub const TOP_COUNT: usize = 12;

    /// Aggregation workers (1 = sequential reference pass)
    pub const WORKERS: usize = 1;

    /// Seconds in one simulated day
    pub const SECS_PER_DAY: u64 = 86_400;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cron-load-analyzer",
    version,
    about = "Cron Load Analyzer - Estimates peak concurrent job load of a cron schedule",
    long_about = "Simulates a cron schedule minute by minute and reports the minutes with the most simultaneously running jobs. The peak count approximates the number of cores needed to run the schedule without queueing.

SCHEDULE FILE FORMAT:
    One job per line: <cron-expression><TAB><job-average-elapsed-time-sec>

        0 * * * *\t68.5
        5 * * * *\t34.2
        15 0 * * *\t1356.8

EXAMPLES:
    # Analyze the default 7 day window
    cron-load-analyzer my_cron_schedule

    # Analyze 30 days
    cron-load-analyzer my_cron_schedule 30

    # Use a configuration file
    cron-load-analyzer my_cron_schedule --config analyzer.json

    # Generate configuration template
    cron-load-analyzer --print-config > analyzer.json

    # Validate the schedule without running the simulation
    cron-load-analyzer my_cron_schedule --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag, JSON)
    3. Default values (lowest priority)"
)]
pub struct CliArgs {
    /// Schedule file with one `<cron-expression><TAB><seconds>` job per line
    #[arg(
        value_name = "SCHEDULE_FILE",
        required_unless_present = "print_config",
        help = "Cron schedule file"
    )]
    pub schedule_file: Option<String>,

    /// Number of days to simulate
    #[arg(
        value_name = "WINDOW_DAYS",
        help = "Number of days to simulate (default: 7)",
        long_help = "Length of the simulated window in days. Must be greater than 0. Default: 7"
    )]
    pub window_days: Option<u64>,

    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Window start instant (RFC 3339)
    #[arg(
        long,
        help = "Window start instant (RFC 3339)",
        long_help = "First instant of the simulated window, e.g. 2000-01-01T00:00:00Z. Buckets start at the first whole minute at or after it. Default: 2000-01-01T00:00:00Z"
    )]
    pub window_start: Option<String>,

    /// Directory for the results file
    #[arg(long, help = "Directory for the results file (default: /var/tmp)")]
    pub output_dir: Option<String>,

    /// Explicit results file path
    #[arg(
        short,
        long,
        help = "Results file path",
        long_help = "Write the full ranked table to this path instead of <output-dir>/cron_load_analysis.<start-time>"
    )]
    pub output: Option<String>,

    /// Number of ranked rows printed to the terminal
    #[arg(long, help = "Number of ranked rows printed to the terminal")]
    pub top: Option<usize>,

    /// Aggregation worker threads
    #[arg(
        long,
        help = "Aggregation worker threads (0 = one per core)",
        long_help = "Number of worker threads used for aggregation. 1 runs the sequential pass, 0 uses one thread per available core. Default: 1"
    )]
    pub workers: Option<usize>,

    /// Results file format
    #[arg(long, help = "Results file format (text or json)")]
    pub output_format: Option<String>,

    /// Directory for rolling log files
    #[arg(long, help = "Write logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Console log format
    #[arg(
        long,
        value_name = "FORMAT",
        value_parser = ["text", "json"],
        help = "Console log format (text or json)",
        long_help = "Format of the log lines written to stderr. Rolling log files are always JSON. Default: text"
    )]
    pub log_format: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate the schedule without running the simulation
    #[arg(long, help = "Validate the schedule without running the simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Number of days to simulate
    pub window_days: Option<u64>,

    /// Window start instant
    pub window_start: Option<DateTime<Utc>>,

    /// Directory for the results file
    pub output_dir: Option<String>,

    /// Explicit results file path
    pub output: Option<String>,

    /// Number of ranked rows printed to the terminal
    pub top_count: Option<usize>,

    /// Aggregation worker threads
    pub workers: Option<usize>,

    /// Results file format
    pub output_format: Option<OutputFormat>,
}

/// Configuration for one analyzer run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Number of days to simulate
    pub window_days: u64,

    /// Window start instant
    pub window_start: DateTime<Utc>,

    /// Directory for the results file
    pub output_dir: String,

    /// Explicit results file path (overrides `output_dir`)
    pub output: Option<String>,

    /// Number of ranked rows printed to the terminal
    pub top_count: usize,

    /// Aggregation worker threads (0 = one per core)
    pub workers: usize,

    /// Results file format
    pub output_format: OutputFormat,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// Window start is not a valid RFC 3339 instant
    #[error("Invalid window start '{0}': expected RFC 3339, e.g. 2000-01-01T00:00:00Z")]
    InvalidWindowStart(String),

    /// Unknown results file format
    #[error("{0}")]
    InvalidOutputFormat(String),
}

/// Validation errors for analyzer configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Window length is invalid
    #[error("Window days must be greater than 0, got {0}")]
    InvalidWindowDays(u64),

    /// Window does not fit the representable time range
    #[error("Window of {days} days starting at {start} exceeds the supported time range")]
    WindowOutOfRange {
        /// Requested window length in days
        days: u64,
        /// Requested window start
        start: DateTime<Utc>,
    },

    /// Top count is invalid
    #[error("Top count must be greater than 0, got {0}")]
    InvalidTopCount(usize),

    /// Output directory is empty
    #[error("Output directory must not be empty")]
    EmptyOutputDir,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_days: defaults::WINDOW_DAYS,
            window_start: DateTime::from_timestamp(defaults::WINDOW_START_UNIX, 0)
                .unwrap_or_default(),
            output_dir: defaults::OUTPUT_DIR.to_string(),
            output: None,
            top_count: defaults::TOP_COUNT,
            workers: defaults::WORKERS,
            output_format: OutputFormat::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args)?;

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            window_days: config_file.window_days.unwrap_or(defaults.window_days),
            window_start: config_file.window_start.unwrap_or(defaults.window_start),
            output_dir: config_file.output_dir.unwrap_or(defaults.output_dir),
            output: config_file.output.or(defaults.output),
            top_count: config_file.top_count.unwrap_or(defaults.top_count),
            workers: config_file.workers.unwrap_or(defaults.workers),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) -> Result<(), ConfigError> {
        if let Some(value) = args.window_days {
            config.window_days = value;
        }
        if let Some(value) = args.window_start {
            config.window_start = DateTime::parse_from_rfc3339(&value)
                .map_err(|_| ConfigError::InvalidWindowStart(value.clone()))?
                .with_timezone(&Utc);
        }
        if let Some(value) = args.output_dir {
            config.output_dir = value;
        }
        if let Some(value) = args.output {
            config.output = Some(value);
        }
        if let Some(value) = args.top {
            config.top_count = value;
        }
        if let Some(value) = args.workers {
            config.workers = value;
        }
        if let Some(value) = args.output_format {
            config.output_format = value.parse().map_err(ConfigError::InvalidOutputFormat)?;
        }
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.window_days == 0 {
            return Err(ConfigValidationError::InvalidWindowDays(self.window_days));
        }

        // The window end must be representable
        let window_end = self
            .window_days
            .checked_mul(defaults::SECS_PER_DAY)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
            .and_then(|span| self.window_start.checked_add_signed(span));
        if window_end.is_none() {
            return Err(ConfigValidationError::WindowOutOfRange {
                days: self.window_days,
                start: self.window_start,
            });
        }

        if self.top_count == 0 {
            return Err(ConfigValidationError::InvalidTopCount(self.top_count));
        }

        if self.output.is_none() && self.output_dir.trim().is_empty() {
            return Err(ConfigValidationError::EmptyOutputDir);
        }

        Ok(())
    }

    /// Window length in seconds
    pub fn window_secs(&self) -> u64 {
        self.window_days.saturating_mul(defaults::SECS_PER_DAY)
    }

    /// Path of the results file for a run started at `started_at`
    pub fn results_path(&self, started_at: DateTime<Utc>) -> PathBuf {
        match &self.output {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.output_dir).join(format!(
                "{}.{}",
                defaults::RESULTS_FILE_PREFIX,
                started_at.timestamp()
            )),
        }
    }
}
