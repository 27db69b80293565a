//! Meter export discovery and loading.
//!
//! Reads semicolon-separated exports (header row first) and converts every
//! row into a [`Sample`] of the requested channel set. Any malformed row
//! aborts the whole load; no partial result is returned.

use std::io::Read;
use std::path::{Path, PathBuf};

use meter_core::error::{ReportError, Result};
use meter_core::models::{ChannelSet, Feed, Sample};
use meter_core::time_utils::parse_timestamp;
use tracing::{debug, warn};

/// Field delimiter of every supported export.
pub const DELIMITER: u8 = b';';

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand the configured inputs into the list of files to read, in order.
///
/// Directories are replaced by the `.csv` files beneath them; plain paths are
/// kept as given (a missing file fails later, when it is opened).
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_csv_files(input);
            if found.is_empty() {
                warn!("No CSV files found in {}", input.display());
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    if files.is_empty() {
        return Err(ReportError::Config("no input files given".to_string()));
    }
    Ok(files)
}

/// Load every sample of one export file.
pub fn load_samples<C: ChannelSet>(path: &Path) -> Result<Vec<Sample<C>>> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let samples = read_samples(file, path)?;
    debug!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Load several export files in the given order and concatenate their
/// samples, e.g. consecutive weekly exports.
pub fn load_samples_from_paths<C: ChannelSet>(paths: &[PathBuf]) -> Result<Vec<Sample<C>>> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(load_samples::<C>(path)?);
    }
    debug!("Loaded {} samples from {} files", all.len(), paths.len());
    Ok(all)
}

/// Parse an export from any reader. `source` is only used in error messages.
pub fn read_samples<C: ChannelSet, R: Read>(reader: R, source: &Path) -> Result<Vec<Sample<C>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| csv_error(source, e))?;
        samples.push(parse_record::<C>(&record, source)?);
    }
    Ok(samples)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_record<C: ChannelSet>(record: &csv::StringRecord, source: &Path) -> Result<Sample<C>> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let format_error = |reason: String| ReportError::DataFormat {
        path: source.to_path_buf(),
        line,
        reason,
    };

    let feed = C::FEED;
    let expected = feed.value_columns() + 1;
    if record.len() != expected {
        return Err(format_error(format!(
            "expected {} fields, found {}",
            expected,
            record.len()
        )));
    }

    let raw_ts = &record[0];
    let timestamp =
        parse_timestamp(raw_ts).ok_or_else(|| format_error(format!("bad timestamp \"{}\"", raw_ts)))?;

    let mut values = Vec::with_capacity(feed.value_columns());
    for raw in record.iter().skip(1) {
        let value = parse_value(raw, feed)
            .ok_or_else(|| format_error(format!("non-numeric value \"{}\"", raw)))?;
        values.push(value);
    }

    let channels = C::from_values(&values)
        .ok_or_else(|| format_error(format!("expected {} values", feed.value_columns())))?;
    Ok(Sample::new(timestamp, channels))
}

/// Parse one numeric field and scale it to reporting units.
fn parse_value(raw: &str, feed: Feed) -> Option<f64> {
    let raw = raw.trim();
    let value: f64 = if feed.accepts_decimal_comma() {
        raw.replace(',', ".").parse().ok()?
    } else {
        raw.parse().ok()?
    };
    Some(value / feed.divisor())
}

fn csv_error(source: &Path, err: csv::Error) -> ReportError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => ReportError::FileRead {
            path: source.to_path_buf(),
            source: io,
        },
        _ => ReportError::DataFormat {
            path: source.to_path_buf(),
            line,
            reason,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use meter_core::models::{ClimateReading, PhaseChannel, PhaseReadings};
    use std::io::Write;
    use tempfile::TempDir;

    const PHASE_HEADER: &str = "timestamp;cons_p1;cons_p2;cons_p3;prod_p1;prod_p2;prod_p3";
    const CLIMATE_HEADER: &str = "timestamp;consumption;production;temperature";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn parse_phases(text: &str) -> Result<Vec<Sample<PhaseReadings>>> {
        read_samples(text.as_bytes(), Path::new("test.csv"))
    }

    fn parse_climate(text: &str) -> Result<Vec<Sample<ClimateReading>>> {
        read_samples(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_phase_feed_scales_wh_to_kwh() {
        let text = format!(
            "{}\n2025-10-13T00:00:00;1500;250;0;12;0;1000\n",
            PHASE_HEADER
        );
        let samples = parse_phases(&text).unwrap();
        assert_eq!(samples.len(), 1);
        let c = samples[0].channels;
        assert!((c[PhaseChannel::ConsumptionL1] - 1.5).abs() < 1e-12);
        assert!((c[PhaseChannel::ConsumptionL2] - 0.25).abs() < 1e-12);
        assert!((c[PhaseChannel::ProductionL1] - 0.012).abs() < 1e-12);
        assert!((c[PhaseChannel::ProductionL3] - 1.0).abs() < 1e-12);
        assert_eq!(
            samples[0].date(),
            NaiveDate::from_ymd_opt(2025, 10, 13).unwrap()
        );
    }

    #[test]
    fn test_header_only_yields_no_samples() {
        let samples = parse_phases(PHASE_HEADER).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_climate_feed_accepts_decimal_comma_and_point() {
        let text = format!(
            "{}\n2025-01-01T00:00:00;1,25;0,5;-3,2\n2025-01-01T01:00:00;2.5;0.0;-3.0\n",
            CLIMATE_HEADER
        );
        let samples = parse_climate(&text).unwrap();
        assert_eq!(samples.len(), 2);
        assert!((samples[0].channels.consumption - 1.25).abs() < 1e-12);
        assert!((samples[0].channels.temperature + 3.2).abs() < 1e-12);
        assert!((samples[1].channels.consumption - 2.5).abs() < 1e-12);
        assert_eq!(samples[1].timestamp.hour(), 1);
    }

    #[test]
    fn test_phase_feed_rejects_decimal_comma() {
        let text = format!("{}\n2025-10-13T00:00:00;1,5;0;0;0;0;0\n", PHASE_HEADER);
        let err = parse_phases(&text).unwrap_err();
        assert!(matches!(err, ReportError::DataFormat { .. }), "got {err:?}");
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        let text = format!(
            "{}\n2025-10-13T00:00:00;1;2;3;4;5;6\n2025-10-13T01:00:00;1;2;3\n",
            PHASE_HEADER
        );
        match parse_phases(&text).unwrap_err() {
            ReportError::DataFormat { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("expected 7 fields, found 4"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let text = format!("{}\n13.10.2025 00:00;1;0;0\n", CLIMATE_HEADER);
        match parse_climate(&text).unwrap_err() {
            ReportError::DataFormat { reason, .. } => assert!(reason.contains("bad timestamp")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_value_is_fatal_even_after_good_rows() {
        let text = format!(
            "{}\n2025-01-01T00:00:00;1;0;2\n2025-01-01T01:00:00;abc;0;2\n",
            CLIMATE_HEADER
        );
        match parse_climate(&text).unwrap_err() {
            ReportError::DataFormat { reason, .. } => {
                assert!(reason.contains("non-numeric value \"abc\""), "{reason}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = format!(
            "{}\n2025-01-01T00:00:00;1;0;2\n\n2025-01-01T01:00:00;1;0;2\n\n",
            CLIMATE_HEADER
        );
        assert_eq!(parse_climate(&text).unwrap().len(), 2);
    }

    #[test]
    fn test_load_samples_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_samples::<ClimateReading>(&tmp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ReportError::FileRead { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_samples_from_paths_keeps_file_order() {
        let tmp = TempDir::new().unwrap();
        let week41 = write_csv(
            tmp.path(),
            "week41.csv",
            &[PHASE_HEADER, "2025-10-06T00:00:00;1000;0;0;0;0;0"],
        );
        let week42 = write_csv(
            tmp.path(),
            "week42.csv",
            &[PHASE_HEADER, "2025-10-13T00:00:00;2000;0;0;0;0;0"],
        );

        let samples = load_samples_from_paths::<PhaseReadings>(&[week41, week42]).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].timestamp < samples[1].timestamp);
        assert!((samples[1].channels[PhaseChannel::ConsumptionL1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_csv_files_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        write_csv(tmp.path(), "week43.csv", &[PHASE_HEADER]);
        write_csv(tmp.path(), "week41.csv", &[PHASE_HEADER]);
        write_csv(tmp.path(), "notes.txt", &["not data"]);

        let files = find_csv_files(tmp.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["week41.csv", "week43.csv"]);
    }

    #[test]
    fn test_find_csv_files_missing_dir() {
        assert!(find_csv_files(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn test_expand_inputs_mixes_files_and_directories() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("weeks");
        std::fs::create_dir(&dir).unwrap();
        write_csv(&dir, "b.csv", &[PHASE_HEADER]);
        write_csv(&dir, "a.csv", &[PHASE_HEADER]);
        let single = tmp.path().join("extra.csv");

        let files = expand_inputs(&[single.clone(), dir.clone()]).unwrap();
        assert_eq!(files, vec![single, dir.join("a.csv"), dir.join("b.csv")]);
    }

    #[test]
    fn test_expand_inputs_empty_is_config_error() {
        let err = expand_inputs(&[]).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
