// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use cron_load_analyzer::*;

mod end_to_end_tests;
mod recurrence_tests;

#[test]
fn test_default_configuration() {
    let config = AnalyzerConfig::default();

    assert_eq!(config.window_days, 7);
    assert_eq!(config.window_start.timestamp(), 946_684_800);
    assert_eq!(config.output_dir, "/var/tmp");
    assert_eq!(config.top_count, 12);
    assert_eq!(config.workers, 1);
    assert_eq!(config.output_format, OutputFormat::Text);
    assert!(config.validate().is_ok());
}

#[test]
fn test_error_categories() {
    let errors = vec![
        AnalyzerError::usage_error("expected 1 or 2 arguments"),
        AnalyzerError::input_format_error("File content is empty"),
        AnalyzerError::configuration_error("bad"),
    ];

    for error in &errors {
        assert_eq!(error.exit_code(), 1);
    }
    assert_eq!(errors[0].category(), "Usage");
    assert_eq!(errors[1].category(), "Input Format");
}

#[test]
fn test_occupancy_rule() {
    assert_eq!(occupied_buckets(0.0), 1);
    assert_eq!(occupied_buckets(59.0), 1);
    assert_eq!(occupied_buckets(59.5), 2);
    assert_eq!(occupied_buckets(3600.0), 62);
}
