//! Assessment Log
//!
//! Append-only CSV persistence: one row per inference call, consumed by the
//! offline reporting tooling. The engine has no dependency on this module;
//! the ingestion layer writes a row after every assessment.

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fuzzy::engine::Assessment;
use crate::sensor::Freshness;

const HEADER: [&str; 9] = [
    "timestamp",
    "screen_hours",
    "temperature",
    "humidity",
    "air_quality",
    "stress_value",
    "category",
    "message",
    "sensor_freshness",
];

/// One persisted assessment row.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    /// RFC 3339 timestamp of the inference call.
    pub timestamp: DateTime<Utc>,
    pub screen_hours: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: f64,
    pub stress_value: f64,
    pub category: &'static str,
    pub message: &'static str,
    /// Sensor freshness at assessment time: fresh, stale or missing.
    pub sensor_freshness: &'static str,
}

impl AssessmentRecord {
    pub fn new(
        inputs: (f64, f64, f64, f64),
        assessment: &Assessment,
        freshness: Freshness,
    ) -> Self {
        let (screen_hours, temperature, humidity, air_quality) = inputs;
        Self {
            timestamp: Utc::now(),
            screen_hours,
            temperature,
            humidity,
            air_quality,
            stress_value: assessment.stress_value,
            category: assessment.category.as_str(),
            message: assessment.message,
            sensor_freshness: freshness.as_str(),
        }
    }
}

/// Append-only CSV log of assessments.
pub struct AssessmentLog {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: u64,
}

impl AssessmentLog {
    /// Open (or create) the log at `path`. The header row is written once,
    /// when the file is created; reopening an existing log resumes appending
    /// and recovers the persisted row count for `/stats`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let existing_rows = match csv::Reader::from_path(&path) {
            Ok(mut reader) => reader.records().filter_map(|r| r.ok()).count() as u64,
            Err(_) => 0,
        };
        let is_new = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            writer,
            path,
            rows: existing_rows,
        })
    }

    /// Append one row and flush it to disk.
    pub fn append(&mut self, record: &AssessmentRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows appended, including rows recovered from a previous run.
    pub fn len(&self) -> u64 {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::engine::StressEngine;

    fn temp_log_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("stresswatch-{name}-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn sample_record() -> AssessmentRecord {
        let assessment = StressEngine::new().infer(3.0, 24.0, 50.0, 0.1);
        AssessmentRecord::new((3.0, 24.0, 50.0, 0.1), &assessment, Freshness::Fresh)
    }

    #[test]
    fn test_log_writes_header_and_rows() {
        let path = temp_log_path("header");
        {
            let mut log = AssessmentLog::open(&path).unwrap();
            assert!(log.is_empty());
            log.append(&sample_record()).unwrap();
            log.append(&sample_record()).unwrap();
            assert_eq!(log.len(), 2);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,screen_hours,temperature,humidity,air_quality,stress_value,category,message,sensor_freshness"
        );
        assert_eq!(lines.count(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_reopen_appends_and_recovers_count() {
        let path = temp_log_path("reopen");
        {
            let mut log = AssessmentLog::open(&path).unwrap();
            log.append(&sample_record()).unwrap();
        }
        {
            let mut log = AssessmentLog::open(&path).unwrap();
            assert_eq!(log.len(), 1);
            log.append(&sample_record()).unwrap();
            assert_eq!(log.len(), 2);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        // One header plus two data rows, no duplicated header.
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.matches("timestamp").count(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_rows_round_trip_through_csv_reader() {
        let path = temp_log_path("roundtrip");
        {
            let mut log = AssessmentLog::open(&path).unwrap();
            log.append(&sample_record()).unwrap();
        }

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), HEADER.len());
        assert_eq!(&row[6], "Low");
        assert_eq!(&row[8], "fresh");
        let _ = std::fs::remove_file(&path);
    }
}
