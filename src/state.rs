use crate::error::AppError;
use crate::metadata::CaptureRecord;
use std::fs;
use std::path::Path;

/// Reads the record of the last applied capture. Any failure means "no
/// previous state" and is only logged.
pub fn load_state(path: &Path) -> Option<CaptureRecord> {
    match read_record(path) {
        Ok(record) => {
            log::debug!("Previous capture from {:?}: {}", path, record.capture_timestamp);
            Some(record)
        }
        Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No state file at {:?}", path);
            None
        }
        Err(e) => {
            log::warn!("Ignoring unreadable state file {:?}: {}", path, e);
            None
        }
    }
}

fn read_record(path: &Path) -> Result<CaptureRecord, AppError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Best effort: a failed write is logged and otherwise ignored.
pub fn save_state(path: &Path, record: &CaptureRecord) {
    let result = serde_json::to_vec(record)
        .map_err(AppError::from)
        .and_then(|buf| fs::write(path, buf).map_err(AppError::from));

    match result {
        Ok(()) => log::debug!("State written to {:?}", path),
        Err(e) => log::warn!("Could not write state file {:?}: {}", path, e),
    }
}
