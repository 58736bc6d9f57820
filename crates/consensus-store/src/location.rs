use crate::error::StoreError;
use crate::lockfile::Lockfile;
use consensus_core::DecisionId;
use std::fs;
use std::path::PathBuf;

const PREFIX: &str = "id: ";

/// The decision currently open in this store directory.
///
/// `LOCATION` holds `"id: <decision id>"`; a missing file means the home view.
pub struct LocationFile {
    path: PathBuf,
}

impl LocationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<Option<DecisionId>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        let hex = content
            .strip_prefix(PREFIX)
            .ok_or_else(|| StoreError::InvalidLocation(content.to_string()))?;
        DecisionId::parse(hex)
            .map(Some)
            .map_err(|_| StoreError::InvalidLocation(content.to_string()))
    }

    pub fn set(&self, id: &DecisionId) -> Result<(), StoreError> {
        let content = format!("{}{}\n", PREFIX, id);
        let mut lock = Lockfile::acquire(&self.path)?;
        lock.write_all(content.as_bytes())?;
        lock.commit()
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
