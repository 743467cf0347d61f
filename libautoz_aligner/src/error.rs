use std::path::PathBuf;
use thiserror::Error;

use super::machine::MachineType;
use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, Error)]
pub enum MachineError {
    #[error("Unknown machine type {0}; expected one of J750, J750EX, UFLEX, ETS88, Accotest, AG93000, T2K")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Timestamp {0:?} is not in the YYYY/MM/DD HH:MM:SS.mmm format: {1}")]
    BadFormat(String, String),
}

#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("Could not open log file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Log file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Anchor marker {0:?} was not found in the AutoZ log")]
    AnchorNotFound(String),
    #[error("No anchor marker is configured for machine type {0}; set ets88_marker in the configuration")]
    MarkerNotConfigured(MachineType),
    #[error("Locator failed due to log file error: {0}")]
    FileError(#[from] LogFileError),
}

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("AutoZ log timestamp not available; process the AutoZ log first")]
    AnchorUnavailable,
    #[error("Extractor failed to convert the anchor timestamp: {0}")]
    ConversionError(#[from] TimestampError),
    #[error("Could not find a standard ndlp-correct point at or after {0}")]
    StandardPointNotFound(String),
    #[error("Extractor failed due to log file error: {0}")]
    FileError(#[from] LogFileError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Report failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Report failed to format the generation time: {0}")]
    TimeError(#[from] time::error::Format),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Locator error: {0}")]
    LocatorError(#[from] LocatorError),
    #[error("Processor failed due to Extractor error: {0}")]
    ExtractorError(#[from] ExtractorError),
    #[error("Processor failed due to Report error: {0}")]
    ReportError(#[from] ReportError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
}
