//! Figures derived from an [`AnalysisResult`] for reporting.
//!
//! All per-axis figures are computed over the concatenation of every wafer's series,
//! with wafers ordered by start time.
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::wafer::AnalysisResult;

/// Two values closer than this are taken to be the same measurement.
pub const STANDARD_MATCH_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn standard(&self, result: &AnalysisResult) -> f64 {
        match self {
            Self::X => result.x_standard(),
            Self::Y => result.y_standard(),
            Self::Z => result.z_standard(),
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(format!("Invalid axis type {s}")),
        }
    }
}

/// One axis of every wafer laid end to end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSeries {
    pub values: Vec<f64>,
    /// The wafer each value belongs to
    pub labels: Vec<String>,
    /// Inclusive `[first, last]` indices of each non-empty wafer, in order
    pub boundaries: Vec<(String, usize, usize)>,
    /// The first value is the standard point carried into its wafer's series
    pub starts_with_standard: bool,
}

impl AxisSeries {
    pub fn new(result: &AnalysisResult, axis: Axis) -> Self {
        let mut series = Self::default();
        for (wafer_id, record) in result.sorted_wafers() {
            let values = match axis {
                Axis::X => &record.x_values,
                Axis::Y => &record.y_values,
                Axis::Z => &record.z_values,
            };
            if values.is_empty() {
                continue;
            }
            let start = series.values.len();
            series.values.extend_from_slice(values);
            series
                .labels
                .extend(std::iter::repeat(wafer_id.clone()).take(values.len()));
            series
                .boundaries
                .push((wafer_id.clone(), start, series.values.len() - 1));
        }
        let standard = axis.standard(result);
        series.starts_with_standard = series
            .values
            .first()
            .is_some_and(|first| (first - standard).abs() < STANDARD_MATCH_TOLERANCE);
        series
    }
}

/// Summary figures of one axis. Every figure is zero for an empty series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std: f64,
    pub count: usize,
}

impl AxisStatistics {
    pub fn new(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let count = values.len();
        let n = count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            min,
            max,
            mean,
            median,
            std: variance.sqrt(),
            count,
        }
    }
}

/// Points falling strictly below the axis standard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyStatistics {
    pub total_points: usize,
    pub normal_points: usize,
    pub anomaly_points: usize,
    pub anomaly_percent: f64,
}

impl AnomalyStatistics {
    pub fn new(values: &[f64], standard: f64) -> Self {
        let total_points = values.len();
        let anomaly_points = values.iter().filter(|v| **v < standard).count();
        Self {
            total_points,
            normal_points: total_points - anomaly_points,
            anomaly_points,
            anomaly_percent: percent(anomaly_points, total_points),
        }
    }
}

/// A dashboard row: how many of a wafer's z values fell below the z standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferStatus {
    pub wafer_id: String,
    pub below_standard: bool,
    pub below_count: usize,
    pub total_count: usize,
    pub percent_below: f64,
}

/// Status of every wafer that has z values, ordered by start time.
pub fn wafer_statuses(result: &AnalysisResult) -> Vec<WaferStatus> {
    let z_standard = result.z_standard();
    result
        .sorted_wafers()
        .into_iter()
        .filter(|(_, record)| !record.z_values.is_empty())
        .map(|(wafer_id, record)| {
            let below_count = record.z_values.iter().filter(|z| **z < z_standard).count();
            let total_count = record.z_values.len();
            WaferStatus {
                wafer_id: wafer_id.clone(),
                below_standard: below_count > 0,
                below_count,
                total_count,
                percent_below: percent(below_count, total_count),
            }
        })
        .collect()
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
