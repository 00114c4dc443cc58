//! JSONL event reader - sequential reader for replay

use crate::error::EventError;
use crate::record::JournalRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential journal reader for replay
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Create a new reader from a directory
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        // Date-named files sort chronologically
        files.sort();

        Ok(Self { files })
    }

    /// Read all records from all files in order
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, EventError> {
        let mut records = Vec::new();

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);

            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: JournalRecord =
                    serde_json::from_str(&line).map_err(|e| EventError::InvalidRecord {
                        file: file_path.display().to_string(),
                        line: index + 1,
                        reason: e.to_string(),
                    })?;
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Get the last record (for sequence and prev_hash)
    pub fn last_record(&self) -> Result<Option<JournalRecord>, EventError> {
        Ok(self.read_all()?.into_iter().last())
    }

    /// Count total records across all files
    pub fn count(&self) -> Result<usize, EventError> {
        let mut count = 0;

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }

        Ok(count)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}
