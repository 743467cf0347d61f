use std::path::Path;

use super::error::{ExtractorError, LocatorError};
use super::extractor::process_all_log;
use super::locator::{locator_for, process_autoz_log};
use super::machine::MachineType;
use super::wafer::AnalysisResult;

/// The state of one interactive analysis: which tester was picked, the anchor found in
/// its AutoZ log and the result extracted from its ALL log.
///
/// The AutoZ log must be processed before the ALL log. Picking another machine
/// discards both.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    machine: MachineType,
    ets88_marker: Option<String>,
    anchor: Option<String>,
    result: Option<AnalysisResult>,
}

impl AnalysisSession {
    pub fn new(machine: MachineType, ets88_marker: Option<String>) -> Self {
        Self {
            machine,
            ets88_marker,
            anchor: None,
            result: None,
        }
    }

    pub fn select_machine(&mut self, machine: MachineType) {
        log::info!("Machine type selected: {machine}");
        self.machine = machine;
        self.anchor = None;
        self.result = None;
    }

    pub fn machine(&self) -> MachineType {
        self.machine
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Locate the anchor in an AutoZ log. A failure clears any previous anchor and result.
    pub fn process_autoz_log(&mut self, path: &Path) -> Result<&str, LocatorError> {
        self.anchor = None;
        self.result = None;
        let locator = locator_for(self.machine, self.ets88_marker.as_deref())?;
        let anchor = process_autoz_log(path, locator.as_ref())?;
        log::info!("AutoZ log processed successfully. Timestamp: {anchor}");
        Ok(self.anchor.insert(anchor).as_str())
    }

    /// Extract the measurements of an ALL log using the current anchor.
    pub fn process_all_log(&mut self, path: &Path) -> Result<&AnalysisResult, ExtractorError> {
        self.result = None;
        let result = process_all_log(path, self.anchor.as_deref())?;
        Ok(self.result.insert(result))
    }
}
