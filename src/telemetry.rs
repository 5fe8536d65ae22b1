//! Append-only event log for navigation diagnostics.
//!
//! One JSON object per line, written best-effort: a failed write is logged
//! and swallowed, never surfaced to the control loop.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::core::Coordinate;
use crate::error::Result;
use crate::navigation::NavStatus;

/// One progression sample or state transition.
#[derive(Clone, Debug, Serialize)]
pub struct ProgressRecord {
    /// Unix epoch milliseconds
    pub timestamp_ms: u64,
    pub status: NavStatus,
    pub current_position: Option<Coordinate>,
    pub target_position: Coordinate,
    pub distance_remaining: Option<f64>,
    pub heading_degrees: f64,
    pub attempts: u32,
    /// Human-readable note on transitions ("stuck, retrying", "arrived")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Current wall-clock time as unix epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append-only JSONL writer.
pub struct EventLog {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    records_written: u64,
    write_failures: u64,
}

impl EventLog {
    /// Open (or create) a log file for appending.
    pub fn to_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path: Some(path),
            records_written: 0,
            write_failures: 0,
        })
    }

    /// A log that discards everything (the default for embedded use).
    pub fn disabled() -> Self {
        Self {
            writer: None,
            path: None,
            records_written: 0,
            write_failures: 0,
        }
    }

    /// Append one record. Best-effort: failures are counted and logged,
    /// never returned.
    pub fn record(&mut self, record: &ProgressRecord) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };

        let result = serde_json::to_string(record)
            .map_err(std::io::Error::other)
            .and_then(|line| {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()
            });

        match result {
            Ok(()) => self.records_written += 1,
            Err(e) => {
                self.write_failures += 1;
                tracing::warn!(
                    "event log write failed ({}), {} failures so far: {}",
                    self.path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    self.write_failures,
                    e
                );
            }
        }
    }

    /// Records successfully written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("path", &self.path)
            .field("records_written", &self.records_written)
            .field("write_failures", &self.write_failures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(status: NavStatus) -> ProgressRecord {
        ProgressRecord {
            timestamp_ms: now_ms(),
            status,
            current_position: Some(Coordinate::new(10.0, 20.0)),
            target_position: Coordinate::new(100.0, 100.0),
            distance_remaining: Some(120.4),
            heading_degrees: 41.6,
            attempts: 1,
            note: None,
        }
    }

    #[test]
    fn test_writes_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav-events.jsonl");

        let mut log = EventLog::to_file(&path).unwrap();
        log.record(&sample_record(NavStatus::Moving));
        log.record(&ProgressRecord {
            note: Some("arrived".into()),
            ..sample_record(NavStatus::Arrived)
        });
        assert_eq!(log.records_written(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["status"], "moving");
        assert_eq!(first["target_position"]["x"], 100.0);
        assert!(first["timestamp_ms"].as_u64().unwrap() > 0);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["status"], "arrived");
        assert_eq!(second["note"], "arrived");
    }

    #[test]
    fn test_disabled_log_discards() {
        let mut log = EventLog::disabled();
        log.record(&sample_record(NavStatus::Moving));
        assert_eq!(log.records_written(), 0);
        assert!(!log.is_enabled());
    }

    #[test]
    fn test_appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav-events.jsonl");

        EventLog::to_file(&path)
            .unwrap()
            .record(&sample_record(NavStatus::Moving));
        EventLog::to_file(&path)
            .unwrap()
            .record(&sample_record(NavStatus::Arrived));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
