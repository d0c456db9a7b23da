//! End-to-end tests of the analysis pipeline through the public API

use chrono::{TimeZone, Utc};
use cron_load_analyzer::report::writer::HEADER;
use cron_load_analyzer::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE_SCHEDULE: &str = "\
# nightly and hourly jobs
0 * * * *\t68.5
5 * * * *\t34.2
15 0 * * *\t1356.8
*/10 8-18 * * 1-5\t600
30 2 1,15 * SUN\t7200
";

fn write_schedule(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("my_cron_schedule");
    fs::write(&path, content).unwrap();
    path
}

fn config(dir: &TempDir, window_days: u64, workers: usize) -> AnalyzerConfig {
    AnalyzerConfig {
        window_days,
        workers,
        output_dir: dir.path().display().to_string(),
        ..Default::default()
    }
}

fn ranked_counts(outcome: &AnalysisOutcome) -> Vec<(usize, u32)> {
    outcome
        .report
        .all()
        .iter()
        .map(|bucket| (bucket.index, bucket.running_count))
        .collect()
}

/// Two non-overlapping hourly jobs never run together
#[test]
fn test_reference_scenario_peaks_at_one() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, "0 * * * *\t68.5\n5 * * * *\t34.2\n");
    let orchestrator = AnalysisOrchestrator::new(config(&dir, 1, 1), &path).unwrap();

    let outcome = orchestrator.run().unwrap();

    assert_eq!(outcome.summary.bucket_count, 1440);
    assert_eq!(outcome.summary.peak_running_count(), 1);
    // Minutes 0, 1 and 5 of every hour are busy
    let busy = outcome
        .report
        .all()
        .iter()
        .filter(|bucket| bucket.running_count == 1)
        .count();
    assert_eq!(busy, 72);
}

/// An hourly job running an hour overlaps its next firing for two minutes
#[test]
fn test_hourly_job_overlaps_itself() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, "0 * * * *\t3600\n");
    let orchestrator = AnalysisOrchestrator::new(config(&dir, 1, 1), &path).unwrap();

    let outcome = orchestrator.run().unwrap();
    let peak = outcome.report.peak().unwrap();

    assert_eq!(peak.running_count, 2);
    assert_eq!(peak.instant, Utc.with_ymd_and_hms(2000, 1, 1, 1, 0, 0).unwrap());
    // Two overlap minutes after each of the 23 following firings
    let doubled = outcome
        .report
        .all()
        .iter()
        .filter(|bucket| bucket.running_count == 2)
        .count();
    assert_eq!(doubled, 46);
}

/// Fresh runs over the same input give identical rankings
#[test]
fn test_runs_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, SAMPLE_SCHEDULE);
    let orchestrator = AnalysisOrchestrator::new(config(&dir, 7, 1), &path).unwrap();

    let first = orchestrator.run().unwrap();
    let second = orchestrator.run().unwrap();

    assert_eq!(first.report, second.report);
}

/// The worker pool reproduces the sequential result exactly
#[test]
fn test_parallel_equals_sequential() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, SAMPLE_SCHEDULE);

    let sequential = AnalysisOrchestrator::new(config(&dir, 7, 1), &path)
        .unwrap()
        .run()
        .unwrap();
    for workers in [2, 3, 0] {
        let parallel = AnalysisOrchestrator::new(config(&dir, 7, workers), &path)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(ranked_counts(&parallel), ranked_counts(&sequential));
    }
}

/// A non-aligned window start moves the grid to the next minute boundary
#[test]
fn test_unaligned_window_start() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, "* * * * *\t0\n");
    let config = AnalyzerConfig {
        window_start: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 30).unwrap(),
        ..config(&dir, 1, 1)
    };
    let orchestrator = AnalysisOrchestrator::new(config, &path).unwrap();

    let outcome = orchestrator.run().unwrap();
    let first = outcome.report.all().iter().min_by_key(|b| b.index).unwrap();

    // The window still ends 24h after 00:00:30, so 00:00 of the next day is included
    assert_eq!(outcome.summary.bucket_count, 1440);
    assert_eq!(first.instant, Utc.with_ymd_and_hms(2000, 1, 1, 0, 1, 0).unwrap());
}

/// A malformed line aborts before anything is written
#[test]
fn test_malformed_line_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, "0 * * * *\t68.5\n0 * * *\t10\n");
    let orchestrator = AnalysisOrchestrator::new(config(&dir, 1, 1), &path).unwrap();

    let error = orchestrator.run().unwrap_err();

    assert_eq!(error.category(), "Input Format");
    assert!(error.to_string().contains("line 2"));
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

/// The results file holds the header and every bucket in ranked order
#[test]
fn test_results_file_contents() {
    let dir = TempDir::new().unwrap();
    let path = write_schedule(&dir, "15 0 * * *\t1356.8\n");
    let orchestrator = AnalysisOrchestrator::new(config(&dir, 1, 1), &path).unwrap();
    let outcome = orchestrator.run().unwrap();

    let started_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let written = orchestrator.write_report(&outcome, started_at).unwrap();
    let content = fs::read_to_string(&written).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(
        written.file_name().unwrap().to_str().unwrap(),
        format!("cron_load_analysis.{}", started_at.timestamp())
    );
    assert_eq!(lines.len(), 1441);
    assert_eq!(lines[0], HEADER);
    // 23 busy minutes from 00:15, earliest first
    assert_eq!(lines[1], "yyyy-01-01 00:15:00\t1");
    assert_eq!(lines[23], "yyyy-01-01 00:37:00\t1");
    assert_eq!(lines[24], "yyyy-01-01 00:00:00\t0");
}
