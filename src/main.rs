// Cron Load Analyzer - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/cron-load-analyzer my_cron_schedule
// ```
//
// Or with a longer window and a worker pool:
//
// ```console
// $ ./target/release/cron-load-analyzer my_cron_schedule 30 --workers 0 --verbose
// ```

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::Parser;
use cron_load_analyzer::report::render_summary_table;
use cron_load_analyzer::simulation::{AnalysisOrchestrator, AnalyzerError, LoggingConfig};
use cron_load_analyzer::types::{AnalyzerConfig, CliArgs};
use indicatif::{ProgressBar, ProgressStyle};
use std::process;
use tracing::{error, info};

fn main() {
    // Argument errors exit with status 1; help and version exit cleanly
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match AnalyzerConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    if let Err(e) = LoggingConfig::from_cli_args(&args).init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let started_at = Utc::now();
    info!("Starting Cron Load Analyzer");

    if let Err(e) = run(args, started_at) {
        let exit_code = match e.downcast_ref::<AnalyzerError>() {
            Some(analyzer_error) => {
                error!(
                    category = analyzer_error.category(),
                    "Analysis failed: {}", analyzer_error
                );
                analyzer_error.exit_code()
            }
            None => 1,
        };
        eprintln!("Error: {:#}", e);
        process::exit(exit_code);
    }

    info!("Cron Load Analyzer completed successfully");
}

/// Load configuration, run the analysis and report the results
fn run(args: CliArgs, started_at: DateTime<Utc>) -> anyhow::Result<()> {
    let schedule_file = args
        .schedule_file
        .clone()
        .ok_or_else(|| AnalyzerError::usage_error("missing SCHEDULE_FILE argument"))?;
    let dry_run = args.dry_run;

    // Load configuration from CLI arguments and optional config file
    let config = AnalyzerConfig::from_cli_args(args)
        .map_err(AnalyzerError::from)
        .context("Failed to load configuration")?;

    let orchestrator = AnalysisOrchestrator::new(config, &schedule_file)
        .context("Configuration validation failed")?;

    // Handle dry run mode
    if dry_run {
        let jobs = orchestrator
            .validate_only()
            .with_context(|| format!("Failed to load schedule '{}'", schedule_file))?;
        eprintln!("Schedule validation successful: {} jobs", jobs.len());
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(orchestrator.config());
        return Ok(());
    }

    print_startup_banner(orchestrator.config(), &schedule_file);

    let jobs = orchestrator
        .validate_only()
        .with_context(|| format!("Failed to load schedule '{}'", schedule_file))?;

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress.set_message("simulating");

    let orchestrator = orchestrator.with_progress(progress);
    let outcome = orchestrator
        .run_with_jobs(&jobs)
        .context("Simulation failed")?;

    print!(
        "{}",
        render_summary_table(&outcome.report, orchestrator.config().top_count)
    );

    let path = orchestrator
        .write_report(&outcome, started_at)
        .context("Failed to save results")?;
    println!("Complete results saved to {}", path.display());

    eprintln!();
    eprint!("{}", outcome.summary.render());
    println!("Done");

    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &AnalyzerConfig, schedule_file: &str) {
    eprintln!("Cron Load Analyzer");
    eprintln!("==================");
    eprintln!("Schedule: {}", schedule_file);
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &AnalyzerConfig) {
    eprintln!("Configuration:");
    eprintln!("  Window: {} days", config.window_days);
    eprintln!("  Window Start: {}", config.window_start.to_rfc3339());
    match &config.output {
        Some(path) => eprintln!("  Results File: {}", path),
        None => eprintln!("  Output Directory: {}", config.output_dir),
    }
    eprintln!("  Output Format: {}", config.output_format);
    eprintln!("  Top Rows: {}", config.top_count);
    if config.workers == 0 {
        eprintln!("  Workers: one per core");
    } else {
        eprintln!("  Workers: {}", config.workers);
    }
    eprintln!();
}
