use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::timestamp::CompactTimestamp;

/// The measurements attributed to one wafer.
///
/// The three value lists always have the same length; they are only ever appended to
/// together from a single `ndlp-correct` line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaferRecord {
    pub start_time: CompactTimestamp,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub z_values: Vec<f64>,
}

impl WaferRecord {
    pub fn new(start_time: CompactTimestamp) -> Self {
        Self {
            start_time,
            ..Default::default()
        }
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x_values.push(x);
        self.y_values.push(y);
        self.z_values.push(z);
    }

    pub fn len(&self) -> usize {
        self.z_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_values.is_empty()
    }
}

/// The calibration baseline: the first measurement at or after the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: CompactTimestamp,
}

/// Everything extracted from one pair of log files.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub wafer_data: FxHashMap<String, WaferRecord>,
    pub standard: StandardPoint,
}

impl AnalysisResult {
    pub fn x_standard(&self) -> f64 {
        self.standard.x
    }

    pub fn y_standard(&self) -> f64 {
        self.standard.y
    }

    pub fn z_standard(&self) -> f64 {
        self.standard.z
    }

    pub fn standard_timestamp(&self) -> &CompactTimestamp {
        &self.standard.timestamp
    }

    /// Wafers ordered by start time; wafers starting at the same time are ordered by id.
    pub fn sorted_wafers(&self) -> Vec<(&String, &WaferRecord)> {
        sort_wafers(&self.wafer_data)
    }

    pub fn total_points(&self) -> usize {
        self.wafer_data.values().map(WaferRecord::len).sum()
    }
}

pub(crate) fn sort_wafers(wafers: &FxHashMap<String, WaferRecord>) -> Vec<(&String, &WaferRecord)> {
    let mut sorted: Vec<(&String, &WaferRecord)> = wafers.iter().collect();
    sorted.sort_by(|a, b| a.1.start_time.cmp(&b.1.start_time).then_with(|| a.0.cmp(b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_wafers_tie_break() {
        let mut wafer_data = FxHashMap::default();
        wafer_data.insert(
            String::from("ZZ01.02"),
            WaferRecord::new(CompactTimestamp::from("06.06 10:00:00.000")),
        );
        wafer_data.insert(
            String::from("AA01.02"),
            WaferRecord::new(CompactTimestamp::from("06.06 10:00:00.000")),
        );
        wafer_data.insert(
            String::from("MM01.02"),
            WaferRecord::new(CompactTimestamp::from("06.06 09:00:00.000")),
        );
        let result = AnalysisResult {
            wafer_data,
            standard: StandardPoint {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                timestamp: CompactTimestamp::from("06.06 08:00:00.000"),
            },
        };
        let order: Vec<&str> = result
            .sorted_wafers()
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(order, vec!["MM01.02", "AA01.02", "ZZ01.02"]);
    }

    #[test]
    fn test_push_keeps_lengths_equal() {
        let mut record = WaferRecord::new(CompactTimestamp::from("06.06 09:00:00.000"));
        assert!(record.is_empty());
        record.push(1.0, 2.0, 3.0);
        record.push(4.0, 5.0, 6.0);
        assert_eq!(record.len(), 2);
        assert_eq!(record.x_values.len(), record.y_values.len());
        assert_eq!(record.y_values, vec![2.0, 5.0]);
    }
}
