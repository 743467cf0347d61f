//! Stage B: pull the standard point and the per-wafer measurement series out of an
//! ALL log.
//!
//! The ALL log is the same for every tester family. Two kinds of lines matter:
//!
//! ```text
//! 06.06 15:20:00.000 EX_G S : bAB12.34 ...
//! 06.06 15:31:06.010 ... ndlp-correct: ( 12.345, -6.789, 101.250 )
//! ```
//!
//! The first declares a wafer, the second is a measurement. Wafers own the half-open
//! interval from their start time up to the next wafer's start time; the last wafer
//! owns everything after its start. All time comparisons are on the compact
//! timestamp strings.
use fxhash::FxHashMap;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::error::ExtractorError;
use super::log_file::read_log_lines;
use super::timestamp::{to_compact, CompactTimestamp};
use super::wafer::{sort_wafers, AnalysisResult, StandardPoint, WaferRecord};

static WAFER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}\.\d{2} \d{2}:\d{2}:\d{2}\.\d{3}) EX_G S : b([A-Za-z0-9]+[.-][A-Za-z0-9]+)")
        .expect("valid wafer id regex")
});
static NDLP_CORRECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{2}\.\d{2} \d{2}:\d{2}:\d{2}\.\d{3}).*ndlp-correct: \(\s*([-+]?\d+\.\d+),\s*([-+]?\d+\.\d+),\s*([-+]?\d+\.\d+) \)",
    )
    .expect("valid ndlp-correct regex")
});

/// One `ndlp-correct` line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Measurement<'a> {
    timestamp: &'a str,
    x: f64,
    y: f64,
    z: f64,
}

fn parse_measurement(line: &str) -> Option<Measurement<'_>> {
    let caps = NDLP_CORRECT.captures(line)?;
    Some(Measurement {
        timestamp: caps.get(1)?.as_str(),
        x: caps[2].parse().ok()?,
        y: caps[3].parse().ok()?,
        z: caps[4].parse().ok()?,
    })
}

/// Collect every declared wafer with the earliest start time seen for it.
fn discover_wafers(lines: &[String]) -> FxHashMap<String, WaferRecord> {
    let mut wafers: FxHashMap<String, WaferRecord> = FxHashMap::default();
    for line in lines {
        if let Some(caps) = WAFER_ID.captures(line) {
            let timestamp = &caps[1];
            let wafer_id = &caps[2];
            match wafers.get_mut(wafer_id) {
                Some(record) => {
                    if timestamp < record.start_time.as_str() {
                        record.start_time = CompactTimestamp::from(timestamp);
                    }
                }
                None => {
                    wafers.insert(
                        wafer_id.to_string(),
                        WaferRecord::new(CompactTimestamp::from(timestamp)),
                    );
                }
            }
        }
    }
    wafers
}

/// Index into `sorted` of the wafer owning `timestamp`, if any.
fn owning_wafer(sorted: &[(String, CompactTimestamp)], timestamp: &str) -> Option<usize> {
    for (idx, pair) in sorted.windows(2).enumerate() {
        if pair[0].1.as_str() <= timestamp && timestamp < pair[1].1.as_str() {
            return Some(idx);
        }
    }
    match sorted.last() {
        Some((_, start)) if timestamp >= start.as_str() => Some(sorted.len() - 1),
        _ => None,
    }
}

/// Run the extraction over the lines of an ALL log.
///
/// `anchor` is the full timestamp produced by an [`AnchorLocator`](crate::locator::AnchorLocator).
/// The standard point's own line is assigned to a wafer as well, so it also appears as a
/// regular measurement in that wafer's series.
pub fn extract_measurements(
    lines: &[String],
    anchor: Option<&str>,
) -> Result<AnalysisResult, ExtractorError> {
    let anchor = match anchor {
        Some(a) if !a.is_empty() => a,
        _ => return Err(ExtractorError::AnchorUnavailable),
    };
    let converted = to_compact(anchor)?;
    log::info!("Searching for events after {converted}");

    let mut wafer_data = discover_wafers(lines);
    let sorted: Vec<(String, CompactTimestamp)> = sort_wafers(&wafer_data)
        .into_iter()
        .map(|(id, record)| (id.clone(), record.start_time.clone()))
        .collect();
    log::info!("Found {} wafer IDs", sorted.len());
    for (wafer_id, start_time) in sorted.iter() {
        log::debug!("  - {wafer_id}: {start_time}");
    }

    let measurements: Vec<Measurement> = lines
        .iter()
        .filter_map(|line| parse_measurement(line))
        .collect();

    let standard = measurements
        .iter()
        .find(|m| m.timestamp >= converted.as_str())
        .map(|m| StandardPoint {
            x: m.x,
            y: m.y,
            z: m.z,
            timestamp: CompactTimestamp::from(m.timestamp),
        })
        .ok_or_else(|| ExtractorError::StandardPointNotFound(converted.to_string()))?;
    log::info!(
        "Found standard values at {}: X={}, Y={}, Z={}",
        standard.timestamp,
        standard.x,
        standard.y,
        standard.z
    );

    let mut assigned = 0;
    let mut dropped = 0;
    for m in measurements
        .iter()
        .filter(|m| m.timestamp >= standard.timestamp.as_str())
    {
        match owning_wafer(&sorted, m.timestamp) {
            Some(idx) => {
                if let Some(record) = wafer_data.get_mut(&sorted[idx].0) {
                    record.push(m.x, m.y, m.z);
                    assigned += 1;
                }
            }
            None => dropped += 1,
        }
    }
    log::info!("Assigned {assigned} ndlp-correct entries to wafers, {dropped} fell before the first wafer");

    for (wafer_id, record) in sort_wafers(&wafer_data) {
        log::debug!(
            "Wafer ID: {wafer_id} start {} with {} ndlp-correct entries",
            record.start_time,
            record.len()
        );
    }

    Ok(AnalysisResult {
        wafer_data,
        standard,
    })
}

/// Read an ALL log from disk and run the extraction.
pub fn process_all_log(path: &Path, anchor: Option<&str>) -> Result<AnalysisResult, ExtractorError> {
    if anchor.map_or(true, str::is_empty) {
        return Err(ExtractorError::AnchorUnavailable);
    }
    let lines = read_log_lines(path)?;
    extract_measurements(&lines, anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: &str = "2025/06/06 15:31:05.104";

    fn to_lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    fn ndlp(ts: &str, x: f64, y: f64, z: f64) -> String {
        format!("{ts} PROBER ndlp-correct: ( {x:.3}, {y:.3}, {z:.3} )")
    }

    fn wafer(ts: &str, id: &str) -> String {
        format!("{ts} EX_G S : b{id} lot start")
    }

    #[test]
    fn test_earliest_start_wins() {
        let lines = vec![
            wafer("06.06 10:00:00.000", "AB12.34"),
            wafer("06.06 09:59:59.999", "AB12.34"),
            wafer("06.06 10:30:00.000", "AB12.34"),
        ];
        let wafers = discover_wafers(&lines);
        assert_eq!(wafers.len(), 1);
        assert_eq!(wafers["AB12.34"].start_time, "06.06 09:59:59.999");
    }

    #[test]
    fn test_wafer_id_forms() {
        let lines = vec![
            wafer("06.06 10:00:00.000", "AB12-34"),
            wafer("06.06 10:00:01.000", "NoSeparator"),
            String::from("6.06 10:00:02.000 EX_G S : bCD56.78"),
        ];
        let wafers = discover_wafers(&lines);
        assert_eq!(wafers.len(), 1);
        assert!(wafers.contains_key("AB12-34"));
    }

    #[test]
    fn test_parse_measurement() {
        let m = parse_measurement("06.06 15:31:06.010 x ndlp-correct: (  +1.50, -2.25,3.000 )").unwrap();
        assert_eq!(m.timestamp, "06.06 15:31:06.010");
        assert_eq!((m.x, m.y, m.z), (1.5, -2.25, 3.0));
        assert!(parse_measurement("06.06 15:31:06.010 ndlp-correct: ( 1, 2.0, 3.0 )").is_none());
        assert!(parse_measurement("ndlp-correct: ( 1.0, 2.0, 3.0 )").is_none());
    }

    #[test]
    fn test_owning_wafer_intervals() {
        let sorted = vec![
            (String::from("A"), CompactTimestamp::from("06.06 10:00:00.000")),
            (String::from("B"), CompactTimestamp::from("06.06 11:00:00.000")),
        ];
        assert_eq!(owning_wafer(&sorted, "06.06 09:59:59.999"), None);
        assert_eq!(owning_wafer(&sorted, "06.06 10:00:00.000"), Some(0));
        assert_eq!(owning_wafer(&sorted, "06.06 10:59:59.999"), Some(0));
        assert_eq!(owning_wafer(&sorted, "06.06 11:00:00.000"), Some(1));
        assert_eq!(owning_wafer(&sorted, "06.07 00:00:00.000"), Some(1));
        assert_eq!(owning_wafer(&[], "06.07 00:00:00.000"), None);
    }

    #[test]
    fn test_partition_and_standard_reinclusion() {
        let lines = vec![
            wafer("06.06 15:00:00.000", "W01.1"),
            ndlp("06.06 15:30:00.000", 9.0, 9.0, 9.0),
            ndlp("06.06 15:31:06.000", 1.0, 2.0, 100.0),
            ndlp("06.06 15:32:00.000", 1.1, 2.1, 99.5),
            wafer("06.06 15:40:00.000", "W02.1"),
            ndlp("06.06 15:41:00.000", 1.2, 2.2, 100.5),
            ndlp("06.06 15:42:00.000", 1.3, 2.3, 101.0),
        ];
        let result = extract_measurements(&lines, Some(ANCHOR)).unwrap();
        assert_eq!(result.standard_timestamp(), &"06.06 15:31:06.000");
        assert_eq!(result.x_standard(), 1.0);
        assert_eq!(result.z_standard(), 100.0);

        let first = &result.wafer_data["W01.1"];
        assert_eq!(first.z_values, vec![100.0, 99.5]);
        assert_eq!(first.x_values.len(), first.y_values.len());
        let second = &result.wafer_data["W02.1"];
        assert_eq!(second.z_values, vec![100.5, 101.0]);
        assert_eq!(result.total_points(), 4);
    }

    #[test]
    fn test_points_before_first_wafer_dropped() {
        let lines = vec![
            ndlp("06.06 15:31:06.000", 1.0, 2.0, 100.0),
            ndlp("06.06 15:35:00.000", 1.0, 2.0, 100.2),
            wafer("06.06 15:40:00.000", "W02.1"),
            ndlp("06.06 15:41:00.000", 1.2, 2.2, 100.5),
        ];
        let result = extract_measurements(&lines, Some(ANCHOR)).unwrap();
        assert_eq!(result.wafer_data["W02.1"].z_values, vec![100.5]);
        assert_eq!(result.total_points(), 1);
    }

    #[test]
    fn test_empty_wafer_set() {
        let lines = vec![
            ndlp("06.06 15:31:06.000", 1.0, 2.0, 100.0),
            ndlp("06.06 15:41:00.000", 1.2, 2.2, 100.5),
        ];
        let result = extract_measurements(&lines, Some(ANCHOR)).unwrap();
        assert!(result.wafer_data.is_empty());
        assert_eq!(result.z_standard(), 100.0);
    }

    #[test]
    fn test_missing_standard_point() {
        let lines = vec![
            wafer("06.06 15:00:00.000", "W01.1"),
            ndlp("06.06 15:31:05.103", 1.0, 2.0, 100.0),
        ];
        match extract_measurements(&lines, Some(ANCHOR)) {
            Err(ExtractorError::StandardPointNotFound(ts)) => assert_eq!(ts, "06.06 15:31:05.104"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_anchor_unavailable() {
        let lines = to_lines("06.06 15:31:06.000 ndlp-correct: ( 1.0, 2.0, 3.0 )");
        assert!(matches!(
            extract_measurements(&lines, None),
            Err(ExtractorError::AnchorUnavailable)
        ));
        assert!(matches!(
            extract_measurements(&lines, Some("")),
            Err(ExtractorError::AnchorUnavailable)
        ));
        assert!(matches!(
            process_all_log(Path::new("does/not/matter.txt"), None),
            Err(ExtractorError::AnchorUnavailable)
        ));
    }

    #[test]
    fn test_bad_anchor_format() {
        let lines = to_lines("06.06 15:31:06.000 ndlp-correct: ( 1.0, 2.0, 3.0 )");
        assert!(matches!(
            extract_measurements(&lines, Some("06.06 15:31:06.000")),
            Err(ExtractorError::ConversionError(_))
        ));
    }

    #[test]
    fn test_idempotent() {
        let lines = vec![
            wafer("06.06 15:00:00.000", "W01.1"),
            ndlp("06.06 15:31:06.000", 1.0, 2.0, 100.0),
            wafer("06.06 15:40:00.000", "W02.1"),
            wafer("06.06 15:40:00.000", "W03.1"),
            ndlp("06.06 15:41:00.000", 1.2, 2.2, 100.5),
        ];
        let first = extract_measurements(&lines, Some(ANCHOR)).unwrap();
        let second = extract_measurements(&lines, Some(ANCHOR)).unwrap();
        assert_eq!(first, second);
        // Tied start times resolve to the later id
        assert!(first.wafer_data["W02.1"].is_empty());
        assert_eq!(first.wafer_data["W03.1"].z_values, vec![100.5]);
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ALL.txt");
        let text = [
            wafer("06.06 15:00:00.000", "W01.1"),
            ndlp("06.06 15:31:06.000", 1.0, 2.0, 100.0),
        ]
        .join("\n");
        std::fs::write(&path, text).unwrap();
        let result = process_all_log(&path, Some(ANCHOR)).unwrap();
        assert_eq!(result.wafer_data["W01.1"].len(), 1);
        assert!(matches!(
            process_all_log(&dir.path().join("missing.txt"), Some(ANCHOR)),
            Err(ExtractorError::FileError(_))
        ));
    }
}
