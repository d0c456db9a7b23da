//! Schedule input: recurrence rules and the schedule file loader
//!
//! This module turns schedule file text into validated jobs ready for the
//! simulation pass.
//!
//! # Overview
//!
//! - **Recurrence**: five-field cron rules and the "fires at this minute" test
//! - **Loader**: tab-separated schedule parsing and up-front validation

pub mod loader;
pub mod recurrence;

pub use loader::{load_schedule, parse_schedule, read_schedule_file, validate_jobs, ScheduledJob};
pub use recurrence::{Recurrence, RecurrenceError};
