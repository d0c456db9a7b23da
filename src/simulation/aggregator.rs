//! Concurrency aggregation over the simulation grid
//!
//! Every job is tested against every bucket. A firing increments its own
//! bucket and the following `span - 1` buckets, clipped at the grid end.
//! Increments are plain additions, so the work can be split by job across
//! private grids and summed afterwards without changing the result.

use std::fmt;

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::schedule::ScheduledJob;
use crate::simulation::{AnalyzerError, AnalyzerResult, Grid};

/// Count the firings of one job into `grid`; returns the number of firings
pub fn accumulate_job(grid: &mut Grid, job: &ScheduledJob) -> usize {
    let mut firings = 0;
    for index in 0..grid.len() {
        let Some(instant) = grid.instant(index) else {
            break;
        };
        if job.recurrence.fires_at(instant) {
            grid.record_firing(index, job.span);
            firings += 1;
        }
    }
    debug!(
        "Line {}: '{}' fired {} times, {} bucket(s) each",
        job.job.line,
        job.job.expression,
        firings,
        job.span
    );
    firings
}

/// Fills a grid with per-minute running counts
#[derive(Clone)]
pub struct ConcurrencyAggregator {
    /// Worker threads; 1 runs the sequential pass, 0 uses every core
    workers: usize,
    progress: ProgressBar,
}

impl fmt::Debug for ConcurrencyAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrencyAggregator")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl ConcurrencyAggregator {
    /// Create an aggregator without a visible progress bar
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Configured worker count
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Aggregate all jobs into `grid`, in place
    #[instrument(skip(self, grid, jobs), fields(buckets = grid.len(), jobs = jobs.len(), workers = self.workers))]
    pub fn aggregate(&self, grid: &mut Grid, jobs: &[ScheduledJob]) -> AnalyzerResult<()> {
        if self.workers == 1 {
            self.aggregate_sequential(grid, jobs);
            Ok(())
        } else {
            self.aggregate_parallel(grid, jobs)
        }
    }

    /// Reference pass: buckets in chronological order, every job per bucket
    fn aggregate_sequential(&self, grid: &mut Grid, jobs: &[ScheduledJob]) {
        info!(
            "Aggregating {} jobs over {} buckets sequentially",
            jobs.len(),
            grid.len()
        );
        self.progress.set_length(grid.len() as u64);

        for index in 0..grid.len() {
            let Some(instant) = grid.instant(index) else {
                break;
            };
            for job in jobs {
                if job.recurrence.fires_at(instant) {
                    grid.record_firing(index, job.span);
                }
            }
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
    }

    /// Job-partitioned pass: each worker fills a private grid, then the
    /// partial grids are summed
    fn aggregate_parallel(&self, grid: &mut Grid, jobs: &[ScheduledJob]) -> AnalyzerResult<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| {
                AnalyzerError::configuration_error(format!(
                    "failed to start {} aggregation workers: {}",
                    self.workers, e
                ))
            })?;

        info!(
            "Aggregating {} jobs over {} buckets on {} workers",
            jobs.len(),
            grid.len(),
            pool.current_num_threads()
        );
        self.progress.set_length(jobs.len() as u64);

        let blank = grid.blank_copy();
        let progress = &self.progress;
        let totals = pool.install(|| {
            jobs.par_iter()
                .fold(
                    || blank.clone(),
                    |mut partial, job| {
                        accumulate_job(&mut partial, job);
                        progress.inc(1);
                        partial
                    },
                )
                .reduce(
                    || blank.clone(),
                    |mut left, right| {
                        left.merge(&right);
                        left
                    },
                )
        });
        grid.merge(&totals);

        self.progress.finish_and_clear();
        Ok(())
    }
}
