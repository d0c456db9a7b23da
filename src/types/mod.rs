//! Core types and configuration for the cron load analyzer
//!
//! This module contains the job record, shared enumerations and the analyzer
//! configuration used throughout the pipeline.
//!
//! # Overview
//!
//! - **Job**: one schedule line (cron expression + average duration)
//! - **Enums**: output format of the results file
//! - **Configuration**: analyzer configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use cron_load_analyzer::types::*;
//!
//! let job = Job::new("0 * * * *", 68.5, 1);
//! assert_eq!(job.line, 1);
//!
//! let config = AnalyzerConfig {
//!     window_days: 1,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod job;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use job::*;
