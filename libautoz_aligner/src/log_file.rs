use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::LogFileError;

/// Split raw log bytes into lines. Undecodable bytes are replaced, never rejected.
///
/// `\r\n`, a lone `\r` and `\n` all end a line. A trailing terminator does not
/// produce an empty last line.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(String::from)
        .collect()
}

/// Read a tester log file into memory as a list of lines.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>, LogFileError> {
    if !path.exists() {
        return Err(LogFileError::BadFilePath(path.to_path_buf()));
    }

    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    log::info!(
        "Read {} from {}",
        human_bytes::human_bytes(bytes.len() as f64),
        path.display()
    );

    Ok(decode_lines(&bytes))
}
