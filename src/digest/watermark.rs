//! Persisted timestamp of the last delivered newsletter.
//!
//! The file holds a single ISO-8601 timestamp and nothing else. A missing or
//! corrupt file means "no cutoff": it never blocks a run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jellydigest_common::{format_timestamp, parse_timestamp, Result};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct Watermark {
    path: PathBuf,
}

impl Watermark {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored timestamp.
    ///
    /// Returns `None` when the file does not exist, cannot be read, or does
    /// not contain a timestamp.
    pub fn load(&self) -> Option<DateTime<Utc>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No watermark file yet");
                return None;
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read watermark file");
                return None;
            }
        };

        match parse_timestamp(&content) {
            Ok(ts) => Some(ts),
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    content = %content.trim(),
                    error = %e,
                    "Watermark file does not hold an ISO-8601 timestamp; ignoring it. \
                     Delete the file to let it be recreated"
                );
                None
            }
        }
    }

    /// Overwrite the stored timestamp, creating parent directories as needed.
    pub fn store(&self, ts: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format_timestamp(&ts))?;
        info!(path = %self.path.display(), watermark = %format_timestamp(&ts), "Stored watermark");
        Ok(())
    }
}

/// Whether an item created at `created` falls before `cutoff`.
///
/// Items without a creation date, and every item when there is no cutoff,
/// are kept.
pub fn is_before_cutoff(created: Option<DateTime<Utc>>, cutoff: Option<DateTime<Utc>>) -> bool {
    match (created, cutoff) {
        (Some(created), Some(cutoff)) => created < cutoff,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn round_trip_to_the_second() {
        let dir = tempfile::tempdir().unwrap();
        let watermark = Watermark::new(dir.path().join("LAST_NEWSLETTER.txt"));

        let ts = Utc::now().with_nanosecond(0).unwrap();
        watermark.store(ts).unwrap();
        assert_eq!(watermark.load(), Some(ts));
    }

    #[test]
    fn store_overwrites_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let watermark = Watermark::new(dir.path().join("config/nested/LAST.txt"));

        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        watermark.store(first).unwrap();
        watermark.store(second).unwrap();

        assert_eq!(watermark.load(), Some(second));
        let content = std::fs::read_to_string(watermark.path()).unwrap();
        assert_eq!(content, "2024-02-01T08:00:00Z");
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let watermark = Watermark::new(dir.path().join("absent.txt"));
        assert_eq!(watermark.load(), None);
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn corrupt_file_logs_error_and_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LAST_NEWSLETTER.txt");
        std::fs::write(&path, "not-a-date").unwrap();
        let watermark = Watermark::new(path);

        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer({
                let log = log.clone();
                move || log.clone()
            })
            .finish();
        let loaded = tracing::subscriber::with_default(subscriber, || watermark.load());

        assert_eq!(loaded, None);
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ERROR"));
        assert!(output.contains("does not hold an ISO-8601 timestamp"));
        assert!(output.contains("not-a-date"));
    }

    #[test]
    fn legacy_naive_timestamp_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LAST_NEWSLETTER.txt");
        std::fs::write(&path, "2024-03-01T09:15:00.123456\n").unwrap();

        let ts = Watermark::new(path).load().unwrap();
        assert_eq!(
            ts.with_nanosecond(0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
        );
    }

    #[test]
    fn cutoff_is_strict_and_advisory() {
        let cutoff = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();

        assert!(is_before_cutoff(Some(before), Some(cutoff)));
        assert!(!is_before_cutoff(Some(cutoff), Some(cutoff)));
        assert!(!is_before_cutoff(Some(before), None));
        assert!(!is_before_cutoff(None, Some(cutoff)));
    }
}
