use crate::backend::{ChangeFeed, DecisionStore};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::feed::{ChangeEvent, ChangeKind, FeedHub, Subscription};
use crate::location::LocationFile;
use crate::lockfile::{write_json_atomic, Lockfile};
use crate::recents::RecentsIndex;
use chrono::Utc;
use consensus_core::{Decision, DecisionDraft, DecisionId, DecisionPatch};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

const STORE_DIR: &str = ".consensus";

static CREATE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Decisions persisted as JSON files under `.consensus/`.
///
/// Layout:
/// - `config.json`          store settings
/// - `LOCATION`             currently open decision
/// - `recents.json`         local recents list
/// - `decisions/<id>.json`  one record per decision
///
/// The feed is in-process. Writes made through this handle are published
/// immediately; writes made by other processes surface through [`poll`](Self::poll).
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
    dir: PathBuf,
    config: StoreConfig,
    hub: FeedHub,
    seen: Arc<Mutex<HashMap<DecisionId, u64>>>,
}

impl FileStore {
    /// Create a new store at `path`.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let dir = root.join(STORE_DIR);

        if dir.exists() {
            return Err(StoreError::StoreExists(dir.display().to_string()));
        }

        fs::create_dir_all(dir.join("decisions"))?;
        let config = StoreConfig::default();
        config.save(dir.join("config.json"))?;
        tracing::info!(path = %dir.display(), "initialized store");

        Ok(Self::with_config(root, config))
    }

    /// Open an existing store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let dir = root.join(STORE_DIR);

        if !dir.exists() {
            return Err(StoreError::StoreNotFound(root.display().to_string()));
        }

        let config = StoreConfig::load(dir.join("config.json"))?;
        Ok(Self::with_config(root, config))
    }

    /// Search upward from `start` for a `.consensus/` directory and open it.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut current = start.as_ref().to_path_buf();
        loop {
            if current.join(STORE_DIR).exists() {
                return Self::open(&current);
            }
            if !current.pop() {
                return Err(StoreError::StoreNotFound(
                    start.as_ref().display().to_string(),
                ));
            }
        }
    }

    fn with_config(root: PathBuf, config: StoreConfig) -> Self {
        Self {
            dir: root.join(STORE_DIR),
            root,
            config,
            hub: FeedHub::new(),
            seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn location(&self) -> LocationFile {
        LocationFile::new(self.dir.join("LOCATION"))
    }

    pub fn recents(&self) -> RecentsIndex {
        RecentsIndex::at(self.dir.join("recents.json"), self.config.recents_limit)
    }

    fn decisions_dir(&self) -> PathBuf {
        self.dir.join("decisions")
    }

    fn record_path(&self, id: &DecisionId) -> PathBuf {
        self.decisions_dir().join(format!("{}.json", id))
    }

    fn seen(&self) -> MutexGuard<'_, HashMap<DecisionId, u64>> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_record(&self, id: &DecisionId) -> Result<Decision, StoreError> {
        let data = match fs::read_to_string(self.record_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::DecisionNotFound(id.to_string()))
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(serde_json::from_str(&data)?)
    }

    fn publish(&self, kind: ChangeKind, record: Decision) {
        self.seen().insert(record.id.clone(), record.version);
        let delivered = self.hub.publish(&ChangeEvent { kind, record });
        tracing::debug!(delivered, "published change");
    }

    fn next_id(&self, title: &str) -> DecisionId {
        loop {
            let seed = format!(
                "{}\0{}\0{}\0{}",
                title,
                Utc::now().timestamp_nanos_opt().unwrap_or_default(),
                std::process::id(),
                CREATE_COUNTER.fetch_add(1, Ordering::Relaxed)
            );
            let id = DecisionId::generate(seed.as_bytes());
            if !self.record_path(&id).exists() {
                return id;
            }
        }
    }

    /// Every stored decision, sorted by title then id.
    ///
    /// Files that fail to parse are skipped.
    pub fn list(&self) -> Result<Vec<Decision>, StoreError> {
        let mut results = Vec::new();
        let entries = match fs::read_dir(self.decisions_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(results),
            Err(e) => return Err(StoreError::Io(e)),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|data| serde_json::from_str::<Decision>(&data).map_err(StoreError::from));
            match parsed {
                Ok(decision) => results.push(decision),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable decision")
                }
            }
        }
        results.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(results)
    }

    /// Publish subscribed records that changed on disk since this handle
    /// last saw them. Returns the number of events published.
    pub fn poll(&self) -> Result<usize, StoreError> {
        let mut published = 0;
        for id in self.hub.watched() {
            let record = match self.read_record(&id) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(decision = %id.short(), error = %e, "poll could not read decision");
                    continue;
                }
            };
            let last = self.seen().get(&id).copied().unwrap_or(0);
            if record.version > last {
                self.publish(ChangeKind::Update, record);
                published += 1;
            }
        }
        Ok(published)
    }
}

impl DecisionStore for FileStore {
    fn fetch(&self, id: &DecisionId) -> Result<Decision, StoreError> {
        self.read_record(id)
    }

    fn create(&self, draft: &DecisionDraft) -> Result<Decision, StoreError> {
        let record = draft.clone().into_decision(self.next_id(&draft.title));
        write_json_atomic(self.record_path(&record.id), &record)?;
        tracing::info!(decision = %record.id.short(), title = %record.title, "created decision");
        self.publish(ChangeKind::Insert, record.clone());
        Ok(record)
    }

    fn update(&self, id: &DecisionId, patch: &DecisionPatch) -> Result<(), StoreError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(StoreError::DecisionNotFound(id.to_string()));
        }
        // Hold the lock across read-modify-write so concurrent writers serialize.
        let mut lock = Lockfile::acquire(&path)?;
        let current = self.read_record(id)?;
        let mut next = current.apply_patch(patch);
        next.version = current.version + 1;
        if let Err(e) = next.check_invariants() {
            tracing::warn!(decision = %id.short(), error = %e, "rejected update");
            return Err(e.into());
        }
        lock.write_json(&next)?;
        lock.commit()?;
        tracing::info!(
            decision = %id.short(),
            version = next.version,
            fields = ?patch.fields(),
            "updated decision"
        );
        self.publish(ChangeKind::Update, next);
        Ok(())
    }
}

impl ChangeFeed for FileStore {
    fn subscribe(&self, id: &DecisionId) -> Subscription {
        if let Ok(record) = self.read_record(id) {
            self.seen()
                .entry(id.clone())
                .and_modify(|v| *v = (*v).max(record.version))
                .or_insert(record.version);
        }
        self.hub.subscribe(id)
    }
}
