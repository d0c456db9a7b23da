//! Run statistics printed after an analysis

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::report::writer::format_timestamp;
use crate::simulation::Bucket;

/// Statistics for one analyzer run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of jobs in the schedule
    pub job_count: usize,
    /// Number of minute buckets simulated
    pub bucket_count: usize,
    /// Window start instant
    pub window_start: DateTime<Utc>,
    /// Window length in days
    pub window_days: u64,
    /// Worker threads used for aggregation (0 = one per core)
    pub workers: usize,
    /// Highest-count bucket, if the grid was not empty
    pub peak: Option<Bucket>,
    /// Wall time spent aggregating
    pub aggregation_time: Duration,
}

impl RunSummary {
    /// Highest running count observed; the estimated number of cores needed
    pub fn peak_running_count(&self) -> u32 {
        self.peak.as_ref().map_or(0, |bucket| bucket.running_count)
    }

    /// Human-readable summary
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str("Analysis Summary:\n");
        output.push_str(&format!("   Jobs: {}\n", self.job_count));
        output.push_str(&format!(
            "   Window: {} days from {} ({} minute buckets)\n",
            self.window_days,
            self.window_start.to_rfc3339(),
            self.bucket_count
        ));
        let workers = if self.workers == 0 {
            "all cores".to_string()
        } else {
            format!("{} worker(s)", self.workers)
        };
        output.push_str(&format!(
            "   Aggregation: {:.2} seconds on {}\n",
            self.aggregation_time.as_secs_f64(),
            workers
        ));
        match &self.peak {
            Some(peak) => {
                output.push_str(&format!(
                    "   Peak: {} running jobs at {}\n",
                    peak.running_count,
                    format_timestamp(&peak.instant)
                ));
                output.push_str(&format!(
                    "   Estimated cores needed: {}\n",
                    peak.running_count
                ));
            }
            None => output.push_str("   Peak: no buckets simulated\n"),
        }

        output
    }
}
