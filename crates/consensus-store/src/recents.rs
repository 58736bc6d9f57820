//! Local list of recently opened decisions.
//!
//! The list lives in `recents.json` next to the store and is never synced
//! with it. It is a convenience cache: an unreadable file reads as empty.

use crate::error::StoreError;
use crate::lockfile::write_json_atomic;
use chrono::{DateTime, Utc};
use consensus_core::DecisionId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub id: DecisionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecentsFile {
    version: u32,
    entries: Vec<RecentEntry>,
}

impl Default for RecentsFile {
    fn default() -> Self {
        Self {
            version: 1,
            entries: Vec::new(),
        }
    }
}

enum Backing {
    File(PathBuf),
    Memory(Mutex<Vec<RecentEntry>>),
}

/// Most-recent-first list of `{id, title, createdAt}`, unique by id.
pub struct RecentsIndex {
    backing: Backing,
    limit: usize,
}

impl RecentsIndex {
    pub fn at(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            backing: Backing::File(path.into()),
            limit,
        }
    }

    pub fn in_memory(limit: usize) -> Self {
        Self {
            backing: Backing::Memory(Mutex::new(Vec::new())),
            limit,
        }
    }

    pub fn list(&self) -> Vec<RecentEntry> {
        match &self.backing {
            Backing::File(path) => match fs::read_to_string(path) {
                Ok(data) => serde_json::from_str::<RecentsFile>(&data)
                    .map(|f| f.entries)
                    .unwrap_or_else(|e| {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable recents file");
                        Vec::new()
                    }),
                Err(_) => Vec::new(),
            },
            Backing::Memory(entries) => entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }

    fn save(&self, mut entries: Vec<RecentEntry>) -> Result<(), StoreError> {
        entries.truncate(self.limit);
        match &self.backing {
            Backing::File(path) => write_json_atomic(
                path,
                &RecentsFile {
                    entries,
                    ..Default::default()
                },
            ),
            Backing::Memory(slot) => {
                *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = entries;
                Ok(())
            }
        }
    }

    /// Put `id` at the front, keeping the `created_at` it was first recorded with.
    pub fn record(&self, id: &DecisionId, title: &str) -> Result<(), StoreError> {
        let mut entries = self.list();
        let created_at = entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.created_at)
            .unwrap_or_else(Utc::now);
        entries.retain(|e| &e.id != id);
        entries.insert(
            0,
            RecentEntry {
                id: id.clone(),
                title: title.to_string(),
                created_at,
            },
        );
        self.save(entries)
    }

    /// Update the stored title in place. Unknown ids are ignored.
    pub fn rename(&self, id: &DecisionId, title: &str) -> Result<(), StoreError> {
        let mut entries = self.list();
        let Some(entry) = entries.iter_mut().find(|e| &e.id == id) else {
            return Ok(());
        };
        if entry.title == title {
            return Ok(());
        }
        entry.title = title.to_string();
        self.save(entries)
    }

    /// Returns whether an entry was removed.
    pub fn remove(&self, id: &DecisionId) -> Result<bool, StoreError> {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(entries)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match &self.backing {
            Backing::File(path) => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::Io(e)),
            },
            Backing::Memory(_) => self.save(Vec::new()),
        }
    }
}
