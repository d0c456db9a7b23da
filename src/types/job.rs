//! Job records loaded from a schedule file

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recurring job: a cron expression plus its average run duration
///
/// Jobs are immutable once loaded. The expression is kept verbatim so that
/// diagnostics can quote it; parsing happens in the validate stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Five-field cron expression as written in the schedule file
    pub expression: String,
    /// Average elapsed time of one run, in seconds
    pub average_duration_secs: f64,
    /// 1-based line number in the schedule file
    pub line: usize,
}

impl Job {
    /// Create a new job record
    pub fn new(expression: impl Into<String>, average_duration_secs: f64, line: usize) -> Self {
        Self {
            expression: expression.into(),
            average_duration_secs,
            line,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: '{}' ({}s)",
            self.line, self.expression, self.average_duration_secs
        )
    }
}
