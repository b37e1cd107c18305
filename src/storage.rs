//! JSON file persistence for the CLI and server shells.
//!
//! The board core has no opinion on persistence; this is one caller's choice.
//! The whole collection is written at once, through a sibling temp file and a
//! rename. Writers hold an exclusive `fs2` lock on `<file>.lock` from the
//! moment they read the collection they are about to replace until the
//! rename lands, so a CLI command and a running server never overwrite each
//! other's changes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::board::models::JobApplication;
use crate::board::store::JobStore;
use crate::errors::StorageError;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    jobs: Vec<JobApplication>,
}

/// A locked read of the job file. Commit writes a new collection while the
/// lock is still held; dropping without committing writes nothing.
pub struct Transaction<'a> {
    store: &'a mut JsonFileStore,
    _lock: FileLock,
}

impl JsonFileStore {
    /// Load the collection at `path`. A missing file is an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let jobs = load_jobs(&path)?;
        debug!(path = %path.display(), count = jobs.len(), "job file loaded");
        Ok(Self { path, jobs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The collection as of the last load, reload or commit.
    pub fn jobs(&self) -> &[JobApplication] {
        &self.jobs
    }

    /// Re-read the file, picking up writes from other processes.
    pub fn reload(&mut self) -> Result<&[JobApplication], StorageError> {
        self.jobs = load_jobs(&self.path)?;
        Ok(&self.jobs)
    }

    /// Lock the file and re-read it. The lock is released when the
    /// transaction is committed or dropped.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, StorageError> {
        let lock = FileLock::acquire(&self.path)?;
        self.jobs = load_jobs(&self.path)?;
        Ok(Transaction {
            store: self,
            _lock: lock,
        })
    }

    /// Replace whatever is on disk with `jobs`.
    pub fn save(&mut self, jobs: Vec<JobApplication>) -> Result<(), StorageError> {
        let _lock = FileLock::acquire(&self.path)?;
        write_jobs(&self.path, &jobs)?;
        self.jobs = jobs;
        Ok(())
    }

    /// Write `jobs` only if the file still holds `expected`. Used by callers
    /// that read, wait on the user, and then write.
    pub fn save_if_unchanged(
        &mut self,
        expected: &[JobApplication],
        jobs: Vec<JobApplication>,
    ) -> Result<(), StorageError> {
        let tx = self.transaction()?;
        if tx.jobs() != expected {
            return Err(StorageError::Conflict {
                path: tx.path().to_path_buf(),
            });
        }
        tx.commit(jobs)
    }
}

impl Transaction<'_> {
    pub fn path(&self) -> &Path {
        &self.store.path
    }

    /// The collection read under the lock.
    pub fn jobs(&self) -> &[JobApplication] {
        &self.store.jobs
    }

    /// Write `jobs` and release the lock. On failure the store keeps the
    /// collection it read.
    pub fn commit(self, jobs: Vec<JobApplication>) -> Result<(), StorageError> {
        write_jobs(&self.store.path, &jobs)?;
        self.store.jobs = jobs;
        Ok(())
    }
}

impl JobStore for JsonFileStore {
    fn get_all(&mut self) -> Result<Vec<JobApplication>, StorageError> {
        Ok(self.reload()?.to_vec())
    }

    fn replace_all(&mut self, jobs: Vec<JobApplication>) -> Result<(), StorageError> {
        self.save(jobs)
    }

    fn modify<R, E>(
        &mut self,
        f: impl FnOnce(&[JobApplication]) -> Result<(Option<Vec<JobApplication>>, R), E>,
    ) -> Result<R, E>
    where
        E: From<StorageError>,
    {
        let tx = self.transaction()?;
        let (next, out) = f(tx.jobs())?;
        if let Some(next) = next {
            tx.commit(next)?;
        }
        Ok(out)
    }
}

/// Exclusive lock on `<file>.lock`, released on drop.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))
            .map_err(|source| StorageError::Lock {
                path: path.to_path_buf(),
                source,
            })?;
        file.lock_exclusive().map_err(|source| StorageError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn load_jobs(path: &Path) -> Result<Vec<JobApplication>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn lock_path(path: &Path) -> PathBuf {
    sibling(path, ".lock")
}

/// Write through `<file>.tmp` and a rename. Callers hold the lock.
fn write_jobs(path: &Path, jobs: &[JobApplication]) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(jobs).map_err(StorageError::Serialize)?;
    let tmp_path = sibling(path, ".tmp");

    File::create(&tmp_path)
        .and_then(|mut tmp| {
            tmp.write_all(json.as_bytes())?;
            tmp.write_all(b"\n")?;
            tmp.sync_all()
        })
        .map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;

    fs::rename(&tmp_path, path).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = jobs.len(), "job file written");
    Ok(())
}
