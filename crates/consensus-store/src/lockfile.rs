use crate::error::StoreError;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive write guard for a single store file.
///
/// Creating `<target>.lock` with `create_new` is the lock. Content goes into
/// the lock file and [`commit`](Self::commit) renames it over the target, so
/// readers never observe a half-written record. An uncommitted lock is
/// removed on drop.
pub struct Lockfile {
    target: PathBuf,
    lock_path: PathBuf,
    file: Option<fs::File>,
}

impl Lockfile {
    pub fn acquire(target: impl AsRef<Path>) -> Result<Self, StoreError> {
        let target = target.as_ref().to_path_buf();
        let lock_path = Self::lock_path_for(&target);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(file) => Ok(Self {
                target,
                lock_path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StoreError::LockConflict(lock_path.display().to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn lock_path_for(target: &Path) -> PathBuf {
        target.with_extension(
            target
                .extension()
                .map(|e| format!("{}.lock", e.to_string_lossy()))
                .unwrap_or_else(|| "lock".to_string()),
        )
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), StoreError> {
        match self.file {
            Some(ref mut file) => {
                file.write_all(data)?;
                file.flush()?;
                Ok(())
            }
            None => Err(StoreError::Io(std::io::Error::other(
                "lock file already committed",
            ))),
        }
    }

    /// Serialize `value` as pretty JSON into the lock file.
    pub fn write_json<T: Serialize>(&mut self, value: &T) -> Result<(), StoreError> {
        let mut json = serde_json::to_vec_pretty(value)?;
        json.push(b'\n');
        self.write_all(&json)
    }

    /// Rename the lock file over the target.
    pub fn commit(mut self) -> Result<(), StoreError> {
        self.file.take();
        fs::rename(&self.lock_path, &self.target)?;
        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.file.is_some() {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

/// Lock, write `value` as JSON, and commit in one step.
pub fn write_json_atomic<T: Serialize>(target: impl AsRef<Path>, value: &T) -> Result<(), StoreError> {
    let mut lock = Lockfile::acquire(target)?;
    lock.write_json(value)?;
    lock.commit()
}
