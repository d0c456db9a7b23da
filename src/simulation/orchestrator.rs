//! Main analysis orchestrator
//!
//! This module contains the AnalysisOrchestrator, which runs the pipeline
//! stages in order and stops at the first failure.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::{debug, info, instrument};

use crate::report::{rank, write_results_file, RankedReport, RunSummary};
use crate::schedule::{load_schedule, ScheduledJob};
use crate::simulation::{AnalyzerResult, ConcurrencyAggregator, Grid};
use crate::types::AnalyzerConfig;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Read and parse the schedule file
    Load,
    /// Parse every recurrence rule and compute occupancy spans
    Validate,
    /// Build the zeroed minute grid
    BuildGrid,
    /// Fill the grid with running counts
    Aggregate,
    /// Order buckets by running count
    Rank,
    /// Print the summary and write the results file
    Report,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Load => "load",
            PipelineStage::Validate => "validate",
            PipelineStage::BuildGrid => "build grid",
            PipelineStage::Aggregate => "aggregate",
            PipelineStage::Rank => "rank",
            PipelineStage::Report => "report",
        };
        write!(f, "{}", name)
    }
}

/// Result of a completed analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Buckets in ranked order
    pub report: RankedReport,
    /// Run statistics
    pub summary: RunSummary,
}

/// Coordinates one analysis run
pub struct AnalysisOrchestrator {
    config: AnalyzerConfig,
    schedule_file: PathBuf,
    progress: ProgressBar,
}

impl fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("config", &self.config)
            .field("schedule_file", &self.schedule_file)
            .finish_non_exhaustive()
    }
}

impl AnalysisOrchestrator {
    /// Create an orchestrator for `schedule_file`; the configuration is
    /// validated up front
    #[instrument(skip(config, schedule_file), fields(window_days = config.window_days, workers = config.workers))]
    pub fn new(config: AnalyzerConfig, schedule_file: impl Into<PathBuf>) -> AnalyzerResult<Self> {
        config.validate()?;
        let schedule_file = schedule_file.into();

        info!(
            "Initializing analysis of {} over {} days from {}",
            schedule_file.display(),
            config.window_days,
            config.window_start
        );

        Ok(Self {
            config,
            schedule_file,
            progress: ProgressBar::hidden(),
        })
    }

    /// Report aggregation progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Schedule file being analyzed
    pub fn schedule_file(&self) -> &Path {
        &self.schedule_file
    }

    /// Load and validate the schedule without simulating it
    pub fn validate_only(&self) -> AnalyzerResult<Vec<ScheduledJob>> {
        debug!("Stage: {} + {}", PipelineStage::Load, PipelineStage::Validate);
        let jobs = load_schedule(&self.schedule_file)?;
        info!("Schedule validated: {} jobs", jobs.len());
        Ok(jobs)
    }

    /// Run load, validate, build grid, aggregate and rank
    pub fn run(&self) -> AnalyzerResult<AnalysisOutcome> {
        let jobs = self.validate_only()?;
        self.run_with_jobs(&jobs)
    }

    /// Run the simulation stages over already validated jobs
    #[instrument(skip(self, jobs), fields(jobs = jobs.len()))]
    pub fn run_with_jobs(&self, jobs: &[ScheduledJob]) -> AnalyzerResult<AnalysisOutcome> {
        debug!("Stage: {}", PipelineStage::BuildGrid);
        let mut grid = Grid::build(self.config.window_start, self.config.window_secs());

        debug!("Stage: {}", PipelineStage::Aggregate);
        let aggregator =
            ConcurrencyAggregator::new(self.config.workers).with_progress(self.progress.clone());
        let started = Instant::now();
        aggregator.aggregate(&mut grid, jobs)?;
        let aggregation_time = started.elapsed();
        info!(
            "Aggregated {} buckets in {:.2}s",
            grid.len(),
            aggregation_time.as_secs_f64()
        );

        debug!("Stage: {}", PipelineStage::Rank);
        let report = rank(&grid);

        let summary = RunSummary {
            job_count: jobs.len(),
            bucket_count: grid.len(),
            window_start: self.config.window_start,
            window_days: self.config.window_days,
            workers: self.config.workers,
            peak: report.peak().cloned(),
            aggregation_time,
        };
        info!(
            "Peak of {} running jobs across {} buckets",
            summary.peak_running_count(),
            summary.bucket_count
        );

        Ok(AnalysisOutcome { report, summary })
    }

    /// Write the full ranked table; returns the path written
    pub fn write_report(
        &self,
        outcome: &AnalysisOutcome,
        started_at: DateTime<Utc>,
    ) -> AnalyzerResult<PathBuf> {
        debug!("Stage: {}", PipelineStage::Report);
        let path = self.config.results_path(started_at);
        write_results_file(&path, &outcome.report, self.config.output_format)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::AnalyzerError;
    use crate::types::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    fn schedule(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("schedule");
        fs::write(&path, content).unwrap();
        path
    }

    fn one_day(dir: &TempDir) -> AnalyzerConfig {
        AnalyzerConfig {
            window_days: 1,
            output_dir: dir.path().display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::BuildGrid.to_string(), "build grid");
        assert_eq!(PipelineStage::Report.to_string(), "report");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalyzerConfig {
            window_days: 0,
            ..Default::default()
        };
        let error = AnalysisOrchestrator::new(config, "schedule").unwrap_err();
        assert!(matches!(error, AnalyzerError::ConfigurationError(_)));
    }

    #[test]
    fn test_run_reports_peak() {
        let dir = TempDir::new().unwrap();
        let path = schedule(&dir, "0 * * * *\t68.5\n5 * * * *\t34.2\n");
        let orchestrator = AnalysisOrchestrator::new(one_day(&dir), &path).unwrap();

        let outcome = orchestrator.run().unwrap();

        assert_eq!(outcome.summary.job_count, 2);
        assert_eq!(outcome.summary.bucket_count, 1440);
        assert_eq!(outcome.summary.peak_running_count(), 1);
        assert_eq!(outcome.report.len(), 1440);
        // Earliest bucket of the highest count leads the ranking
        assert_eq!(outcome.report.peak().unwrap().index, 0);
    }

    #[test]
    fn test_validate_only_reports_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = schedule(&dir, "0 * * * *\t10\n61 * * * *\t10\n");
        let orchestrator = AnalysisOrchestrator::new(one_day(&dir), &path).unwrap();

        let error = orchestrator.validate_only().unwrap_err();
        assert!(matches!(error, AnalyzerError::InputFormatError(_)));
        assert!(error.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_schedule_is_input_io_error() {
        let dir = TempDir::new().unwrap();
        let orchestrator =
            AnalysisOrchestrator::new(one_day(&dir), dir.path().join("absent")).unwrap();

        let error = orchestrator.run().unwrap_err();
        assert!(matches!(error, AnalyzerError::InputIoError { .. }));
    }

    #[test]
    fn test_write_report_uses_start_time() {
        let dir = TempDir::new().unwrap();
        let path = schedule(&dir, "*/30 * * * *\t0\n");
        let orchestrator = AnalysisOrchestrator::new(one_day(&dir), &path).unwrap();
        let outcome = orchestrator.run().unwrap();

        let started_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let written = orchestrator.write_report(&outcome, started_at).unwrap();

        assert_eq!(written, dir.path().join("cron_load_analysis.1700000000"));
        let content = fs::read_to_string(&written).unwrap();
        assert_eq!(content.lines().count(), 1441);
    }

    #[test]
    fn test_write_report_json_to_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = schedule(&dir, "@hourly\t120\n");
        let output = dir.path().join("results.jsonl");
        let config = AnalyzerConfig {
            output: Some(output.display().to_string()),
            output_format: OutputFormat::Json,
            ..one_day(&dir)
        };
        let orchestrator = AnalysisOrchestrator::new(config, &path).unwrap();
        let outcome = orchestrator.run().unwrap();

        let written = orchestrator.write_report(&outcome, Utc::now()).unwrap();

        assert_eq!(written, output);
        let first = fs::read_to_string(&written).unwrap();
        assert!(first.lines().next().unwrap().contains("\"running_count\":1"));
    }
}
