//! Simulation of a cron schedule over a minute grid
//!
//! This module contains the pipeline orchestrator, the minute grid, the
//! concurrency aggregator, occupancy rules, logging setup and error handling.
//!
//! # Overview
//!
//! - **AnalysisOrchestrator**: runs the load, validate, build, aggregate and rank stages
//! - **Grid**: one running-count bucket per simulated minute
//! - **ConcurrencyAggregator**: fills the grid, sequentially or on a worker pool
//! - **occupied_buckets**: how many minutes one firing keeps a job running
//! - **AnalyzerError**: error type shared by every stage
//!
//! # Usage Example
//!
//! ```rust
//! use cron_load_analyzer::schedule::{parse_schedule, validate_jobs};
//! use cron_load_analyzer::simulation::*;
//!
//! let jobs = validate_jobs(parse_schedule("0 * * * *\t68.5").unwrap()).unwrap();
//! let start = chrono::DateTime::from_timestamp(946_684_800, 0).unwrap();
//!
//! let mut grid = Grid::build(start, 3600);
//! ConcurrencyAggregator::new(1).aggregate(&mut grid, &jobs).unwrap();
//! assert_eq!(grid.counts()[..3], [1, 1, 0]);
//! ```

pub mod aggregator;
pub mod error;
pub mod grid;
pub mod logging;
pub mod occupancy;
pub mod orchestrator;

// Re-export all public types for convenience
pub use aggregator::*;
pub use error::*;
pub use grid::*;
pub use logging::*;
pub use occupancy::*;
pub use orchestrator::*;
