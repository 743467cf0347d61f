use std::sync::mpsc::Sender;

use super::config::Config;
use super::error::ProcessorError;
use super::report::{generation_time, AnalysisReport, ReportWriter};
use super::session::AnalysisSession;
use super::wafer::AnalysisResult;
use super::worker_status::{Stage, WorkerStatus};

/// The main loop of autoz_aligner.
///
/// This takes in a config (and progress monitor), locates the anchor in the AutoZ log,
/// extracts the ALL log measurements and writes the report if one was requested. Meant
/// to be called from a separate thread so a UI stays responsive during the scans.
pub fn process(config: Config, tx: Sender<WorkerStatus>) -> Result<AnalysisResult, ProcessorError> {
    let mut session = AnalysisSession::new(config.machine, config.ets88_marker.clone());

    tx.send(WorkerStatus::new(0.0, Stage::LocatingAnchor))?;
    log::info!("Processing AutoZ log: {}", config.autoz_log_path.display());
    let anchor = session.process_autoz_log(&config.autoz_log_path)?.to_string();

    tx.send(WorkerStatus::new(0.3, Stage::ExtractingMeasurements))?;
    log::info!("Processing ALL log: {}", config.all_log_path.display());
    let result = session.process_all_log(&config.all_log_path)?.clone();
    log::info!(
        "Extracted {} points across {} wafers",
        result.total_points(),
        result.wafer_data.len()
    );

    if let Some(report_path) = &config.report_path {
        tx.send(WorkerStatus::new(0.9, Stage::WritingReport))?;
        let report = AnalysisReport::new(config.machine, &anchor, &result, generation_time()?);
        ReportWriter::new(report_path).write(&report)?;
    }

    tx.send(WorkerStatus::new(1.0, Stage::Done))?;
    Ok(result)
}
