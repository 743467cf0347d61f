//! Stage A: find the anchor timestamp in an AutoZ log.
//!
//! Each tester family writes a different vocabulary into its AutoZ log, so each has
//! its own locator. Scan direction and whether the first or last qualifying line wins
//! differ between families and are part of each locator's contract.
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::error::LocatorError;
use super::log_file::read_log_lines;
use super::machine::{MachineFamily, MachineType};
use super::timestamp::normalize_full;

const DISPLAY_SITE_MARKER: &str = "[DisplaySite]";
const LAST_CONTACT_MARKER: &str = "Last Contact";
const TRIGGER_MARKER: &str = "[Trigger4PinAlignment]";
const TRIGGER_WAIT_MARKER: &str = "Wait 2 Sec To Trigger 4 Pin Alignment";
const EXEC_INP_CALL_MARKER: &str = "[EXEC_INP_CALL]";
const GET_LAST_CONTACT_MARKER: &str = "[AutoZ Log] Get Last Contact";
pub const T2K_COMPLETION_MARKER: &str = "AutoZ Completed Successful.";

static GET_LAST_CONTACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[AutoZ Log\] (\d{2}:\d{2}:\d{2}\.\d{3}) Get Last Contact")
        .expect("valid get last contact regex")
});
static EXEC_INP_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2}) \d{2}:\d{2}:\d{2}\.\d{3} : \[EXEC_INP_CALL\]")
        .expect("valid exec inp call regex")
});
static EMBEDDED_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})").expect("valid timestamp regex")
});

/// Finds the single reference timestamp of an AutoZ log.
///
/// Returns the full `YYYY/MM/DD HH:MM:SS.mmm` timestamp handed to the extractor.
pub trait AnchorLocator {
    fn locate_anchor(&self, lines: &[String]) -> Result<String, LocatorError>;
}

/// J750, J750EX and UFLEX testers.
///
/// Finds the last `[DisplaySite] ... Last Contact` line, then takes the last
/// `[Trigger4PinAlignment] Wait 2 Sec To Trigger 4 Pin Alignment` line from there to
/// the end of the file. The anchor is the text in front of the trigger marker.
#[derive(Debug, Clone, Default)]
pub struct TriggerAlignmentLocator;

impl AnchorLocator for TriggerAlignmentLocator {
    fn locate_anchor(&self, lines: &[String]) -> Result<String, LocatorError> {
        let display_site_index = lines
            .iter()
            .rposition(|line| {
                line.contains(DISPLAY_SITE_MARKER) && line.contains(LAST_CONTACT_MARKER)
            })
            .ok_or_else(|| {
                LocatorError::AnchorNotFound(format!(
                    "{DISPLAY_SITE_MARKER} {LAST_CONTACT_MARKER}"
                ))
            })?;
        log::debug!("Found {DISPLAY_SITE_MARKER} at line {}", display_site_index + 1);

        // Later triggers overwrite earlier ones
        let mut trigger_time: Option<&str> = None;
        for line in lines[display_site_index..].iter() {
            if line.contains(TRIGGER_WAIT_MARKER) {
                if let Some((prefix, _)) = line.split_once(TRIGGER_MARKER) {
                    trigger_time = Some(prefix.trim());
                }
            }
        }

        match trigger_time {
            Some(time) => {
                log::info!("Found Trigger4PinAlignment timestamp: {time}");
                Ok(time.to_string())
            }
            None => Err(LocatorError::AnchorNotFound(format!(
                "{TRIGGER_MARKER} {TRIGGER_WAIT_MARKER}"
            ))),
        }
    }
}

/// AG93000 testers.
///
/// The last `[AutoZ Log] HH:MM:SS.mmm Get Last Contact` line provides the time of day.
/// Continuing backwards from that same line, the first `[EXEC_INP_CALL]` line provides
/// the date.
#[derive(Debug, Clone, Default)]
pub struct LastContactLocator;

impl AnchorLocator for LastContactLocator {
    fn locate_anchor(&self, lines: &[String]) -> Result<String, LocatorError> {
        let (contact_index, contact_time) = lines
            .iter()
            .enumerate()
            .rev()
            .find_map(|(idx, line)| {
                GET_LAST_CONTACT
                    .captures(line)
                    .map(|caps| (idx, caps[1].to_string()))
            })
            .ok_or_else(|| LocatorError::AnchorNotFound(GET_LAST_CONTACT_MARKER.to_string()))?;
        log::debug!("Found Get Last Contact at line {}", contact_index + 1);

        let exec_date = lines[..=contact_index]
            .iter()
            .rev()
            .find_map(|line| EXEC_INP_CALL.captures(line).map(|caps| caps[1].to_string()))
            .ok_or_else(|| LocatorError::AnchorNotFound(EXEC_INP_CALL_MARKER.to_string()))?;

        let full = format!("{} {}", exec_date.replace('-', "/"), contact_time);
        log::info!("Constructed Get Last Contact timestamp: {full} (date {exec_date}, time {contact_time})");
        Ok(full)
    }
}

/// T2K, ETS88 and Accotest testers.
///
/// Scans backwards for the last line containing the completion marker that also
/// carries a `YYYY-MM-DD HH:MM:SS.mmm` timestamp.
#[derive(Debug, Clone)]
pub struct CompletionMarkerLocator {
    marker: String,
}

impl CompletionMarkerLocator {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }

    pub fn t2k() -> Self {
        Self::new(T2K_COMPLETION_MARKER)
    }
}

impl AnchorLocator for CompletionMarkerLocator {
    fn locate_anchor(&self, lines: &[String]) -> Result<String, LocatorError> {
        let found = lines
            .iter()
            .rev()
            .filter(|line| line.contains(&self.marker))
            .find_map(|line| EMBEDDED_TIMESTAMP.captures(line))
            .map(|caps| normalize_full(&caps[1]));

        match found {
            Some(full) => {
                log::info!("Found {} timestamp: {full}", self.marker);
                Ok(full)
            }
            None => Err(LocatorError::AnchorNotFound(self.marker.clone())),
        }
    }
}

/// Select the locator for a machine type.
///
/// ETS88 and Accotest logs have no built in marker; the operator must supply one.
pub fn locator_for(
    machine: MachineType,
    ets88_marker: Option<&str>,
) -> Result<Box<dyn AnchorLocator + Send>, LocatorError> {
    match machine.family() {
        MachineFamily::J750 => Ok(Box::new(TriggerAlignmentLocator)),
        MachineFamily::Ag93000 => Ok(Box::new(LastContactLocator)),
        MachineFamily::T2k => Ok(Box::new(CompletionMarkerLocator::t2k())),
        MachineFamily::Ets88 => match ets88_marker {
            Some(marker) if !marker.is_empty() => Ok(Box::new(CompletionMarkerLocator::new(marker))),
            _ => Err(LocatorError::MarkerNotConfigured(machine)),
        },
    }
}

/// Read an AutoZ log and locate its anchor timestamp.
pub fn process_autoz_log<L: AnchorLocator + ?Sized>(
    path: &Path,
    locator: &L,
) -> Result<String, LocatorError> {
    let lines = read_log_lines(path)?;
    locator.locate_anchor(&lines)
}
