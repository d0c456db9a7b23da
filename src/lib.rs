//! Cron Load Analyzer
//!
//! Estimates the peak concurrent load of a cron schedule by simulating it
//! minute by minute over a fixed window.
//!
//! # Overview
//!
//! Every job in a schedule file is a cron expression plus the job's average
//! elapsed time. The analyzer lays a grid of one-minute buckets over the
//! window, marks every minute each job runs in, and ranks the minutes by the
//! number of simultaneously running jobs. The highest count approximates the
//! number of cores the schedule needs to run without queueing.
//!
//! ## Key Features
//!
//! - **Vixie cron syntax**: ranges, steps, lists, month and weekday names, macros
//! - **Occupancy model**: a firing occupies `ceil(seconds / 59)` buckets, at least one
//! - **Parallel aggregation**: job-partitioned worker pool with partial-grid merging
//! - **Ranked report**: terminal top-N table and a full results file (text or JSON Lines)
//!
//! ## Quick Start
//!
//! ```rust
//! use cron_load_analyzer::*;
//!
//! let jobs = validate_jobs(parse_schedule("0 * * * *\t68.5\n5 * * * *\t34.2")?)?;
//! let config = AnalyzerConfig {
//!     window_days: 1,
//!     ..Default::default()
//! };
//!
//! let mut grid = Grid::build(config.window_start, config.window_secs());
//! ConcurrencyAggregator::new(config.workers).aggregate(&mut grid, &jobs)?;
//!
//! let report = rank(&grid);
//! assert_eq!(report.peak().map(|bucket| bucket.running_count), Some(1));
//! # Ok::<(), AnalyzerError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Job records, output formats and configuration
//! - [`schedule`]: Schedule file loading and cron recurrence rules
//! - [`simulation`]: Grid, aggregation, orchestration, logging and errors
//! - [`report`]: Ranking, terminal table, results file and run summary
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Schedule   │    │    Grid     │    │ Aggregator  │    │   Report    │
//! │             │    │             │    │             │    │             │
//! │ Loader      │───►│ Minute      │───►│ Sequential  │───►│ Ranker      │
//! │ Recurrence  │    │ Buckets     │    │ Parallel    │    │ Writer      │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                                                        ▲
//!        └──────────────────── Orchestrator ──────────────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod report;
pub mod schedule;
pub mod simulation;
pub mod types;

// Core types and configuration
pub use types::{
    AnalyzerConfig, CliArgs, ConfigError, ConfigFile, ConfigValidationError, Job, OutputFormat,
};

// Schedule loading and recurrence rules
pub use schedule::{
    load_schedule, parse_schedule, read_schedule_file, validate_jobs, Recurrence,
    RecurrenceError, ScheduledJob,
};

// Simulation types and functionality
pub use simulation::{
    accumulate_job, occupied_buckets, AnalysisOrchestrator, AnalysisOutcome, AnalyzerError,
    AnalyzerResult, Bucket, ConcurrencyAggregator, Grid, LoggingConfig, PipelineStage,
};

// Reporting
pub use report::{rank, render_summary_table, write_results, write_results_file, RankedReport, RunSummary};
