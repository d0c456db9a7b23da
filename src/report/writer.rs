//! Terminal table and results file output

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::report::RankedReport;
use crate::simulation::{AnalyzerError, AnalyzerResult, Bucket};
use crate::types::OutputFormat;

/// Column header shared by the terminal table and the results file
pub const HEADER: &str = "Datetime\t\tRunning instances";

/// Rule printed above and below the terminal table
pub const SEPARATOR: &str = "-----------------------------------------";

/// Timestamp layout; the year is masked since the window epoch is synthetic
pub const TIMESTAMP_FORMAT: &str = "yyyy-%m-%d %H:%M:%S";

/// Render a bucket instant for display
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// `<timestamp>\t<running_count>`
pub fn format_row(bucket: &Bucket) -> String {
    format!("{}\t{}", format_timestamp(&bucket.instant), bucket.running_count)
}

/// Terminal summary: header, the top `top` rows and an ellipsis marker
pub fn render_summary_table(report: &RankedReport, top: usize) -> String {
    let mut output = String::new();
    output.push_str(SEPARATOR);
    output.push('\n');
    output.push_str(HEADER);
    output.push('\n');
    for bucket in report.top(top) {
        output.push_str(&format_row(bucket));
        output.push('\n');
    }
    output.push_str("...\n");
    output.push_str(SEPARATOR);
    output.push('\n');
    output
}

/// Write the full ranked table
///
/// A writer that accepts zero bytes fails with `ErrorKind::WriteZero`.
pub fn write_results<W: Write>(
    writer: &mut W,
    report: &RankedReport,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(writer, "{}", HEADER)?;
            for bucket in report.all() {
                writeln!(writer, "{}", format_row(bucket))?;
            }
        }
        OutputFormat::Json => {
            for bucket in report.all() {
                serde_json::to_writer(&mut *writer, bucket)?;
                writer.write_all(b"\n")?;
            }
        }
    }
    writer.flush()
}

/// Create `path` and write the full ranked table to it
///
/// A failed write removes the partly written file.
#[instrument(skip(path, report), fields(path = %path.display(), buckets = report.len()))]
pub fn write_results_file(
    path: &Path,
    report: &RankedReport,
    format: OutputFormat,
) -> AnalyzerResult<()> {
    let file = File::create(path).map_err(|e| AnalyzerError::output_io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    let written = write_results(&mut writer, report, format);
    drop(writer);
    discard_on_error(path, written)?;

    info!("Wrote {} ranked buckets to {}", report.len(), path.display());
    Ok(())
}

/// Map a write failure to `OutputIoError`, deleting the incomplete file
fn discard_on_error(path: &Path, written: io::Result<()>) -> AnalyzerResult<()> {
    written.map_err(|e| {
        warn!("Removing incomplete results file {}", path.display());
        let _ = fs::remove_file(path);
        let source = if e.kind() == io::ErrorKind::WriteZero {
            io::Error::new(io::ErrorKind::WriteZero, "Wrote 0 bytes to file")
        } else {
            e
        };
        AnalyzerError::output_io_error(path, source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::rank;
    use crate::simulation::Grid;
    use chrono::TimeZone;

    fn report() -> RankedReport {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 8, 0, 0).unwrap();
        let mut grid = Grid::build(start, 300);
        grid.record_firing(1, 2);
        grid.record_firing(2, 1);
        rank(&grid)
    }

    /// Accepts nothing, like a full device
    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_timestamp_masks_year() {
        let instant = Utc.with_ymd_and_hms(2000, 1, 10, 8, 5, 0).unwrap();
        assert_eq!(format_timestamp(&instant), "yyyy-01-10 08:05:00");
    }

    #[test]
    fn test_summary_table_layout() {
        let table = render_summary_table(&report(), 2);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(
            lines,
            vec![
                SEPARATOR,
                HEADER,
                "yyyy-01-01 08:02:00\t2",
                "yyyy-01-01 08:01:00\t1",
                "...",
                SEPARATOR,
            ]
        );
    }

    #[test]
    fn test_text_results() {
        let mut buffer = Vec::new();
        write_results(&mut buffer, &report(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "yyyy-01-01 08:02:00\t2");
        assert_eq!(lines[5], "yyyy-01-01 08:04:00\t0");
    }

    #[test]
    fn test_json_results() {
        let mut buffer = Vec::new();
        write_results(&mut buffer, &report(), OutputFormat::Json).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let rows: Vec<Bucket> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[0].running_count, 2);
    }

    #[test]
    fn test_zero_byte_write_fails() {
        let error = write_results(&mut ZeroWriter, &report(), OutputFormat::Text).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_write_results_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results");

        write_results_file(&path, &report(), OutputFormat::Text).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(HEADER));
        assert_eq!(content.lines().count(), 6);
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results");
        std::fs::write(&path, format!("{}\nyyyy-01-01 08:02:00\t2\n", HEADER)).unwrap();

        let failed = Err(io::Error::new(io::ErrorKind::WriteZero, "failed to write whole buffer"));
        let error = discard_on_error(&path, failed).unwrap_err();

        assert!(!path.exists());
        match error {
            AnalyzerError::OutputIoError { path: reported, source } => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), io::ErrorKind::WriteZero);
                assert_eq!(source.to_string(), "Wrote 0 bytes to file");
            }
            other => panic!("expected OutputIoError, got {:?}", other),
        }
    }

    #[test]
    fn test_successful_write_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results");
        std::fs::write(&path, HEADER).unwrap();

        discard_on_error(&path, Ok(())).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_is_output_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results");

        let error = write_results_file(&path, &report(), OutputFormat::Text).unwrap_err();
        assert!(matches!(error, AnalyzerError::OutputIoError { .. }));
    }
}
