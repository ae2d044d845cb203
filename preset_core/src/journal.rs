//! Append-only journal of conversion requests.
//!
//! Requests are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{ConversionRequest, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A conversion request as it was sent
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RequestRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub request: ConversionRequest,
}

impl RequestRecord {
    pub fn new(request: ConversionRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            request,
        }
    }
}

/// Request sink trait for persisting conversion requests
pub trait RequestSink {
    fn append(&mut self, record: &RequestRecord) -> Result<()>;
}

/// JSONL-based request sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RequestSink for JsonlSink {
    fn append(&mut self, record: &RequestRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended request {} to journal", record.id);
        Ok(())
    }
}

/// Read every record from a journal file, oldest first
///
/// Lines that fail to parse are logged and skipped.
pub fn read_records(path: &Path) -> Result<Vec<RequestRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RequestRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse request at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} requests from journal", records.len());
    Ok(records)
}

/// The `limit` most recent records, newest first
pub fn load_recent_records(path: &Path, limit: usize) -> Result<Vec<RequestRecord>> {
    let mut records = read_records(path)?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(limit);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolve, NutritionTargets, RuleSet, Selection};
    use chrono::Duration;

    fn create_test_record(tags: &[&str]) -> RequestRecord {
        let resolution = resolve(&Selection::from_strs(tags), &RuleSet::current());
        RequestRecord::new(ConversionRequest::new(
            &resolution,
            NutritionTargets::default(),
            ["peanut"],
            "en",
        ))
    }

    #[test]
    fn test_append_and_read_single_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("requests.jsonl");

        let record = create_test_record(&["keto"]);
        let mut sink = JsonlSink::new(&path);
        sink.append(&record).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = read_records(&temp_dir.path().join("missing.jsonl")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("requests.jsonl");

        let mut sink = JsonlSink::new(&path);
        sink.append(&create_test_record(&["vegan"])).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        sink.append(&create_test_record(&["paleo"])).unwrap();

        assert_eq!(read_records(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_records_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("requests.jsonl");
        let mut sink = JsonlSink::new(&path);

        let now = Utc::now();
        for (i, tag) in ["keto", "paleo", "halal"].into_iter().enumerate() {
            let mut record = create_test_record(&[tag]);
            record.created_at = now - Duration::minutes(10 - i as i64);
            sink.append(&record).unwrap();
        }

        let recent = load_recent_records(&path, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].request.presets, vec!["halal".to_string()]);
        assert_eq!(recent[1].request.presets, vec!["paleo".to_string()]);
    }
}
