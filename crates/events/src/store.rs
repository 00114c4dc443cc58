//! Journal writer
//!
//! The store owns the head of the hash chain: it seals each ledger event
//! onto the last record it wrote and appends it as one JSON line to the file
//! for the record's UTC date.

use chrono::NaiveDate;
use fundme_ledger::LedgerEvent;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::EventError;
use crate::hash::GENESIS_HASH;
use crate::reader::EventReader;
use crate::record::JournalRecord;

pub struct EventStore {
    dir: PathBuf,
    head: Option<JournalRecord>,
    day: Option<(NaiveDate, BufWriter<File>)>,
}

impl EventStore {
    /// Open the journal in `dir`, creating it if needed, and resume after its
    /// last record
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, EventError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let head = EventReader::from_directory(dir)?.last_record()?;
        Ok(Self::resume(dir, head))
    }

    /// Continue a journal whose last record is already known (e.g. after a
    /// replay). `dir` must exist.
    pub fn resume(dir: impl AsRef<Path>, head: Option<JournalRecord>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            head,
            day: None,
        }
    }

    /// Seal `event` as the next record and append it
    pub fn commit(
        &mut self,
        correlation_id: &str,
        event: LedgerEvent,
    ) -> Result<JournalRecord, EventError> {
        let record = JournalRecord::next(self.head.as_ref(), correlation_id, event);
        self.append(&record)?;
        Ok(record)
    }

    /// Append an already sealed record; it must extend the current head
    pub fn append(&mut self, record: &JournalRecord) -> Result<(), EventError> {
        let (expected_sequence, expected_prev) = match &self.head {
            Some(head) => (head.sequence + 1, head.hash.as_str()),
            None => (1, GENESIS_HASH),
        };
        if record.sequence != expected_sequence || record.prev_hash != expected_prev {
            return Err(EventError::OutOfOrder {
                expected_sequence,
                sequence: record.sequence,
            });
        }

        let line = serde_json::to_string(record)?;
        let writer = self.writer_for(record.timestamp.date_naive())?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;

        debug!(sequence = record.sequence, kind = %record.event.kind(), "Journal record appended");
        self.head = Some(record.clone());
        Ok(())
    }

    /// Writer for the file of `date`, switching files when the day changes
    fn writer_for(&mut self, date: NaiveDate) -> Result<&mut BufWriter<File>, EventError> {
        match self.day.take() {
            Some((current, writer)) if current == date => {
                Ok(&mut self.day.insert((current, writer)).1)
            }
            previous => {
                if let Some((_, mut writer)) = previous {
                    writer.flush()?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(self.file_for(date))?;
                Ok(&mut self.day.insert((date, BufWriter::new(file))).1)
            }
        }
    }

    fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.jsonl", date.format("%Y-%m-%d")))
    }

    /// Last record written or resumed from
    pub fn head(&self) -> Option<&JournalRecord> {
        self.head.as_ref()
    }

    /// Sequence of the head record, 0 for an empty journal
    pub fn last_sequence(&self) -> u64 {
        self.head.as_ref().map_or(0, |r| r.sequence)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        if let Some((_, writer)) = self.day.as_mut() {
            let _ = writer.flush();
        }
    }
}
