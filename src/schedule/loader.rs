//! Schedule file loading and validation
//!
//! A schedule file holds one job per line:
//!
//! ```text
//! <cron-expression><TAB><job-average-elapsed-time-sec>
//! ```
//!
//! Blank lines and `#` comment lines are skipped. Every expression is parsed
//! once, before any simulation work, so a single bad line aborts the run
//! without producing partial results.

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::schedule::Recurrence;
use crate::simulation::occupancy::occupied_buckets;
use crate::simulation::{AnalyzerError, AnalyzerResult};
use crate::types::Job;

/// A job whose recurrence rule has been parsed and validated
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    /// Source job record
    pub job: Job,
    /// Parsed recurrence rule
    pub recurrence: Recurrence,
    /// Buckets occupied by one firing
    pub span: usize,
}

impl ScheduledJob {
    /// Parse the job's expression and precompute its occupancy span
    pub fn new(job: Job) -> AnalyzerResult<Self> {
        let recurrence = Recurrence::parse(&job.expression)
            .map_err(|e| AnalyzerError::line_error(job.line, format!("'{}': {}", job.expression, e)))?;
        let span = occupied_buckets(job.average_duration_secs);
        Ok(Self {
            job,
            recurrence,
            span,
        })
    }
}

/// Read the schedule file into memory
pub fn read_schedule_file(path: &Path) -> AnalyzerResult<String> {
    fs::read_to_string(path).map_err(|e| AnalyzerError::input_io_error(path, e))
}

/// Parse schedule file content into job records
#[instrument(skip(content), fields(bytes = content.len()))]
pub fn parse_schedule(content: &str) -> AnalyzerResult<Vec<Job>> {
    if content.trim().is_empty() {
        return Err(AnalyzerError::input_format_error("File content is empty"));
    }

    let mut jobs = Vec::new();
    for (index, raw_line) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut columns = trimmed.split('\t');
        let expression = columns.next().unwrap_or_default().trim();
        let duration_text = columns
            .next()
            .ok_or_else(|| AnalyzerError::line_error(line, "missing <TAB>-separated duration field"))?
            .trim();

        let extra = columns.count();
        if extra > 0 {
            warn!("Line {}: ignoring {} extra column(s)", line, extra);
        }

        let average_duration_secs: f64 = duration_text.parse().map_err(|e| {
            AnalyzerError::line_error(line, format!("invalid duration '{}': {}", duration_text, e))
        })?;
        if !average_duration_secs.is_finite() || average_duration_secs < 0.0 {
            return Err(AnalyzerError::line_error(
                line,
                format!(
                    "duration must be a non-negative number of seconds, got '{}'",
                    duration_text
                ),
            ));
        }

        debug!("Line {}: '{}' averaging {}s", line, expression, average_duration_secs);
        jobs.push(Job::new(expression, average_duration_secs, line));
    }

    if jobs.is_empty() {
        return Err(AnalyzerError::input_format_error(
            "File contains no jobs (only blank or comment lines)",
        ));
    }

    info!("Parsed {} jobs", jobs.len());
    Ok(jobs)
}

/// Parse every job's recurrence rule, failing on the first invalid one
#[instrument(skip(jobs), fields(job_count = jobs.len()))]
pub fn validate_jobs(jobs: Vec<Job>) -> AnalyzerResult<Vec<ScheduledJob>> {
    let scheduled = jobs
        .into_iter()
        .map(ScheduledJob::new)
        .collect::<AnalyzerResult<Vec<_>>>()?;
    info!("Validated {} recurrence expressions", scheduled.len());
    Ok(scheduled)
}

/// Read, parse and validate a schedule file
pub fn load_schedule(path: &Path) -> AnalyzerResult<Vec<ScheduledJob>> {
    let content = read_schedule_file(path)?;
    validate_jobs(parse_schedule(&content)?)
}
