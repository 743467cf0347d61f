use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use super::error::ReportError;
use super::machine::MachineType;
use super::statistics::{
    wafer_statuses, AnomalyStatistics, Axis, AxisSeries, AxisStatistics, WaferStatus,
};
use super::wafer::{AnalysisResult, StandardPoint, WaferRecord};

const GENERATED_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
/// This is the version of the report format
const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferEntry {
    pub wafer_id: String,
    #[serde(flatten)]
    pub record: WaferRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisEntry {
    pub axis: Axis,
    pub standard: f64,
    pub starts_with_standard: bool,
    pub statistics: AxisStatistics,
    pub anomalies: AnomalyStatistics,
}

/// Everything a reader needs to rebuild the charts and the wafer dashboard.
///
/// Wafers are listed in start time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub version: String,
    pub generated_at: String,
    pub machine: MachineType,
    pub anchor_timestamp: String,
    pub standard: StandardPoint,
    pub total_wafers: usize,
    pub total_points: usize,
    pub axes: Vec<AxisEntry>,
    pub wafer_status: Vec<WaferStatus>,
    pub wafers: Vec<WaferEntry>,
}

impl AnalysisReport {
    pub fn new(
        machine: MachineType,
        anchor_timestamp: &str,
        result: &AnalysisResult,
        generated_at: String,
    ) -> Self {
        let axes = Axis::ALL
            .iter()
            .map(|axis| {
                let series = AxisSeries::new(result, *axis);
                let standard = axis.standard(result);
                AxisEntry {
                    axis: *axis,
                    standard,
                    starts_with_standard: series.starts_with_standard,
                    statistics: AxisStatistics::new(&series.values),
                    anomalies: AnomalyStatistics::new(&series.values, standard),
                }
            })
            .collect();

        let wafers = result
            .sorted_wafers()
            .into_iter()
            .map(|(wafer_id, record)| WaferEntry {
                wafer_id: wafer_id.clone(),
                record: record.clone(),
            })
            .collect();

        Self {
            version: format!("{}:{}", env!("CARGO_PKG_NAME"), FORMAT_VERSION),
            generated_at,
            machine,
            anchor_timestamp: anchor_timestamp.to_string(),
            standard: result.standard.clone(),
            total_wafers: result.wafer_data.len(),
            total_points: result.total_points(),
            axes,
            wafer_status: wafer_statuses(result),
            wafers,
        }
    }
}

/// The current UTC time in the report's format.
pub fn generation_time() -> Result<String, ReportError> {
    Ok(OffsetDateTime::now_utc().format(GENERATED_FORMAT)?)
}

/// Writes an AnalysisReport as YAML.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn write(&self, report: &AnalysisReport) -> Result<(), ReportError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let yaml_str = serde_yaml::to_string(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(yaml_str.as_bytes())?;
        log::info!("Wrote report to {}", self.path.display());
        Ok(())
    }
}
