//! Journal-backed event store
//!
//! Every mutation is appended to `events.jsonl` and fsync'ed before it is
//! applied in memory. On open the journal is replayed to rebuild state.
//! `compact()` rewrites the journal to one `append` line per live event.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::types::{EventPatch, HistoryEvent};
use crate::utils::{atomic_write_with, cleanup_temp_files};

use super::store::{EventStore, InMemoryEventStore};

/// Location of the journal on disk
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub data_dir: PathBuf,
}

impl JournalConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path to events.jsonl
    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }
}

/// One line of the journal
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum JournalEntry {
    Append { event: HistoryEvent },
    Update { event: HistoryEvent },
    Delete { id: String },
}

impl JournalEntry {
    fn to_line(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Event store persisted as a JSON-lines journal
pub struct JournalEventStore {
    config: JournalConfig,
    memory: InMemoryEventStore,
    /// Serializes journal writes; held across write + in-memory apply
    writer: Mutex<File>,
}

impl JournalEventStore {
    /// Open (or create) the journal and replay it
    pub fn open(config: JournalConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let cleaned = cleanup_temp_files(&config.data_dir)?;
        if cleaned > 0 {
            warn!(cleaned, "removed leftover journal temp files");
        }

        let memory = InMemoryEventStore::new();
        let path = config.journal_path();
        let replayed = if path.exists() {
            replay(&path, &memory)?
        } else {
            0
        };

        let writer = open_append(&path)?;
        info!(
            path = %path.display(),
            replayed,
            events = memory.len(),
            "event journal opened"
        );

        Ok(Self {
            config,
            memory,
            writer: Mutex::new(writer),
        })
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Rewrite the journal so it holds exactly one line per live event.
    /// Returns the number of events written.
    pub fn compact(&self) -> StoreResult<usize> {
        let mut writer = self.writer.lock();
        let events = self.memory.all_events()?;
        let path = self.config.journal_path();

        let lines = events
            .iter()
            .map(|event| JournalEntry::Append { event: event.clone() }.to_line())
            .collect::<StoreResult<Vec<_>>>()?;

        atomic_write_with(&path, |w| {
            for line in &lines {
                writeln!(w, "{}", line)?;
            }
            Ok(())
        })?;

        // The old handle points at the replaced file
        *writer = open_append(&path)?;
        info!(events = events.len(), "event journal compacted");
        Ok(events.len())
    }

    fn write_entry(file: &mut File, entry: &JournalEntry) -> StoreResult<()> {
        writeln!(file, "{}", entry.to_line()?)?;
        file.sync_all()?;
        Ok(())
    }
}

impl EventStore for JournalEventStore {
    fn append(&self, event: HistoryEvent) -> StoreResult<()> {
        let mut writer = self.writer.lock();
        if self.memory.get_by_id(&event.id)?.is_some() {
            return Err(StoreError::DuplicateId(event.id));
        }
        Self::write_entry(&mut writer, &JournalEntry::Append { event: event.clone() })?;
        self.memory.append(event)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<HistoryEvent>> {
        self.memory.get_by_id(id)
    }

    fn get_by_property(&self, property_id: &str) -> StoreResult<Vec<HistoryEvent>> {
        self.memory.get_by_property(property_id)
    }

    fn all_events(&self) -> StoreResult<Vec<HistoryEvent>> {
        self.memory.all_events()
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<Option<HistoryEvent>> {
        let mut writer = self.writer.lock();
        if self.memory.get_by_id(id)?.is_none() {
            return Ok(None);
        }
        Self::write_entry(&mut writer, &JournalEntry::Delete { id: id.to_string() })?;
        self.memory.delete_by_id(id)
    }

    fn update(&self, id: &str, patch: &EventPatch) -> StoreResult<Option<HistoryEvent>> {
        let mut writer = self.writer.lock();
        let Some(current) = self.memory.get_by_id(id)? else {
            return Ok(None);
        };
        let updated = current.apply_patch(patch).map_err(StoreError::InvalidPatch)?;
        Self::write_entry(&mut writer, &JournalEntry::Update { event: updated.clone() })?;
        self.memory.replace(updated.clone());
        Ok(Some(updated))
    }
}

fn open_append(path: &Path) -> StoreResult<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Apply every journal line to `memory`; malformed lines are skipped
fn replay(path: &Path, memory: &InMemoryEventStore) -> StoreResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut applied = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let entry: JournalEntry = match serde_json::from_str(&line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(line = line_num + 1, error = %e, "skipping unreadable journal line");
                continue;
            }
        };

        match entry {
            JournalEntry::Append { event } => {
                if let Err(e) = memory.append(event) {
                    warn!(line = line_num + 1, error = %e, "skipping journal append");
                    continue;
                }
            }
            JournalEntry::Update { event } => {
                if !memory.replace(event) {
                    debug!(line = line_num + 1, "journal update for unknown event");
                    continue;
                }
            }
            JournalEntry::Delete { id } => {
                memory.delete_by_id(&id)?;
            }
        }
        applied += 1;
    }

    Ok(applied)
}
