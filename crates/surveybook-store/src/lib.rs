//! # surveybook-store
//!
//! Append-only persistence for survey responses.
//!
//! Responses live in a JSON Lines log. Every mutation appends an entry:
//! a new response, a demographics correction, or a clear marker. The
//! current state is the fold of the log, so nothing is rewritten in place
//! and ids stay monotonic across clears.
//!
//! ## Example
//!
//! ```rust,ignore
//! use surveybook_store::ResponseStore;
//!
//! let store = ResponseStore::open("data/responses.jsonl")?;
//! let record = store.submit(&submitted)?;
//! let all = store.list()?;
//! ```

pub mod import;

pub use import::{read_survey_sheet, read_survey_workbook, ImportedRows};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use surveybook_core::{
    DemographicsPatch, ResponseAnswers, ResponseId, ResponseRecord, SubmittedResponse,
    SurveyStats, ValidationError,
};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt log entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Response {0} not found")]
    NotFound(ResponseId),

    #[error("Import failed: {0}")]
    Import(String),
}

// ============================================================================
// Log Entries
// ============================================================================

/// One line of the response log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LogEntry {
    Response {
        record: ResponseRecord,
    },
    Patch {
        id: ResponseId,
        at: DateTime<Utc>,
        patch: DemographicsPatch,
    },
    Clear {
        at: DateTime<Utc>,
    },
}

/// State obtained by replaying the log
#[derive(Debug, Default)]
struct Snapshot {
    records: BTreeMap<ResponseId, ResponseRecord>,
    last_id: ResponseId,
}

impl Snapshot {
    fn apply(&mut self, entry: LogEntry) {
        match entry {
            LogEntry::Response { record } => {
                self.last_id = self.last_id.max(record.id());
                self.records.insert(record.id(), record);
            }
            LogEntry::Patch { id, patch, .. } => {
                if let Some(record) = self.records.get_mut(&id) {
                    record.patch_demographics(&patch);
                }
            }
            LogEntry::Clear { .. } => self.records.clear(),
        }
    }

    fn ordered(self) -> Vec<ResponseRecord> {
        let mut records: Vec<_> = self.records.into_values().collect();
        records.sort_by_key(|r| (r.submitted_at(), r.id()));
        records
    }
}

// ============================================================================
// Store
// ============================================================================

/// Response log backed by a single file
#[derive(Clone, Debug)]
pub struct ResponseStore {
    path: PathBuf,
}

impl ResponseStore {
    /// Open (or create) the log at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            File::create(&path)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate and persist a raw submission
    pub fn submit(&self, submitted: &SubmittedResponse) -> Result<ResponseRecord, StoreError> {
        let answers = submitted.validate()?;
        self.submit_answers(answers, Utc::now())
    }

    /// Persist already-validated answers with an explicit timestamp
    pub fn submit_answers(
        &self,
        answers: ResponseAnswers,
        submitted_at: DateTime<Utc>,
    ) -> Result<ResponseRecord, StoreError> {
        let id = self.replay()?.last_id + 1;
        let record = ResponseRecord::new(id, submitted_at, answers);
        self.append(&[LogEntry::Response {
            record: record.clone(),
        }])?;
        info!(id, "response submitted");
        Ok(record)
    }

    /// Persist several responses, assigning consecutive ids
    pub fn append_batch(
        &self,
        batch: Vec<(ResponseAnswers, DateTime<Utc>)>,
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        let mut next_id = self.replay()?.last_id;
        let mut entries = Vec::with_capacity(batch.len());
        let mut records = Vec::with_capacity(batch.len());

        for (answers, submitted_at) in batch {
            next_id += 1;
            let record = ResponseRecord::new(next_id, submitted_at, answers);
            entries.push(LogEntry::Response {
                record: record.clone(),
            });
            records.push(record);
        }

        self.append(&entries)?;
        debug!(count = records.len(), "responses appended");
        Ok(records)
    }

    /// All current responses, ordered by submission time
    pub fn list(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        Ok(self.replay()?.ordered())
    }

    pub fn get(&self, id: ResponseId) -> Result<ResponseRecord, StoreError> {
        self.replay()?
            .records
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Correct the demographics of one response
    pub fn patch_demographics(
        &self,
        id: ResponseId,
        patch: DemographicsPatch,
    ) -> Result<ResponseRecord, StoreError> {
        let mut record = self.get(id)?;
        record.patch_demographics(&patch);
        self.append(&[LogEntry::Patch {
            id,
            at: Utc::now(),
            patch,
        }])?;
        info!(id, "demographics patched");
        Ok(record)
    }

    /// Remove every response; returns how many were removed
    pub fn clear(&self) -> Result<usize, StoreError> {
        let count = self.replay()?.records.len();
        self.append(&[LogEntry::Clear { at: Utc::now() }])?;
        info!(count, "responses cleared");
        Ok(count)
    }

    pub fn stats(&self) -> Result<SurveyStats, StoreError> {
        Ok(SurveyStats::from_records(&self.list()?))
    }

    fn replay(&self) -> Result<Snapshot, StoreError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut snapshot = Snapshot::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: LogEntry = serde_json::from_str(&line).map_err(|source| {
                StoreError::Corrupt {
                    line: index + 1,
                    source,
                }
            })?;
            snapshot.apply(entry);
        }

        Ok(snapshot)
    }

    fn append(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        let mut buffer = String::new();
        for entry in entries {
            buffer.push_str(&serde_json::to_string(entry)?);
            buffer.push('\n');
        }
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(buffer.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
