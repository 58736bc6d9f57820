use consensus_core::DecisionId;
use consensus_store::{LocationFile, StoreError};

/// The addressable location that names the open decision.
///
/// `None` is the home view.
pub trait Location {
    fn current(&self) -> Result<Option<DecisionId>, StoreError>;
    fn set(&mut self, id: &DecisionId) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl Location for LocationFile {
    fn current(&self) -> Result<Option<DecisionId>, StoreError> {
        self.read()
    }

    fn set(&mut self, id: &DecisionId) -> Result<(), StoreError> {
        LocationFile::set(self, id)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        LocationFile::clear(self)
    }
}

/// Location with browser-style history.
///
/// `set` and `clear` push an entry and drop anything ahead of the cursor;
/// `back` and `forward` move the cursor without touching the session. Call
/// `SessionController::sync_location` afterwards to follow the move.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    history: Vec<Option<DecisionId>>,
    cursor: usize,
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self {
            history: vec![None],
            cursor: 0,
        }
    }
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at an address that already names a decision.
    pub fn at(id: DecisionId) -> Self {
        Self {
            history: vec![Some(id)],
            cursor: 0,
        }
    }

    fn push(&mut self, entry: Option<DecisionId>) {
        if self.history[self.cursor] == entry {
            return;
        }
        self.history.truncate(self.cursor + 1);
        self.history.push(entry);
        self.cursor += 1;
    }

    /// Returns false when already at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Returns false when already at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> Result<Option<DecisionId>, StoreError> {
        Ok(self.history[self.cursor].clone())
    }

    fn set(&mut self, id: &DecisionId) -> Result<(), StoreError> {
        self.push(Some(id.clone()));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.push(None);
        Ok(())
    }
}
