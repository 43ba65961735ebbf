// src/metadata.rs

use serde::{Deserialize, Serialize};

/// One published full-disk capture, as described by `latest.json` and by the
/// local state file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    #[serde(rename = "date")]
    pub capture_timestamp: String,
    #[serde(rename = "file")]
    pub file_reference: String,
}

impl CaptureRecord {
    #[cfg(test)]
    pub fn new(capture_timestamp: impl Into<String>, file_reference: impl Into<String>) -> Self {
        Self {
            capture_timestamp: capture_timestamp.into(),
            file_reference: file_reference.into(),
        }
    }

    /// Two captures are the same image when their timestamps match; the file
    /// reference is not considered.
    pub fn same_capture(&self, other: &CaptureRecord) -> bool {
        self.capture_timestamp == other.capture_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_remote_descriptor() {
        let body = r#"{"date":"2023-06-01 12:00:00","file":"PI_H08_20230601_1200_TRC_FLDK_R10_PGPFD.png"}"#;
        let record: CaptureRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.capture_timestamp, "2023-06-01 12:00:00");
        assert_eq!(record.file_reference, "PI_H08_20230601_1200_TRC_FLDK_R10_PGPFD.png");
    }

    #[test]
    fn encodes_with_wire_field_names() {
        let record = CaptureRecord::new("2023-06-01 12:00:00", "x.png");
        let value: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2023-06-01 12:00:00");
        assert_eq!(value["file"], "x.png");
    }

    #[test]
    fn same_capture_ignores_file_reference() {
        let a = CaptureRecord::new("2023-06-01 12:00:00", "a.png");
        let b = CaptureRecord::new("2023-06-01 12:00:00", "b.png");
        let c = CaptureRecord::new("2023-06-01 03:00:00", "a.png");
        assert!(a.same_capture(&b));
        assert!(!a.same_capture(&c));
    }
}
