use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::board::drag::{DragController, DropOutcome};
use crate::board::form::{ValidationErrors, validate};
use crate::board::ids::IdGenerator;
use crate::board::models::{JobApplication, JobFields, JobId, JobPatch, Stage};
use crate::board::store::{self, JobStore};
use crate::errors::{BoardError, StorageError};
use crate::storage::JsonFileStore;

/// The server's copy of "the caller": owns the store and the id source,
/// and applies board operations as whole-collection replacements.
///
/// Every mutation runs through [`JobStore::modify`], so the collection it
/// computes from is the one on disk at that moment, and a failed write
/// leaves both the file and the response untouched.
pub struct BoardState<S: JobStore = JsonFileStore> {
    store: S,
    ids: Box<dyn IdGenerator + Send>,
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub job: JobApplication,
    pub from: Stage,
    pub moved: bool,
}

impl<S: JobStore> BoardState<S> {
    pub fn new(store: S, ids: Box<dyn IdGenerator + Send>) -> Self {
        Self { store, ids }
    }

    pub fn jobs(&mut self) -> Result<Vec<JobApplication>, StorageError> {
        self.store.get_all()
    }

    pub fn get(&mut self, id: &JobId) -> Result<Option<JobApplication>, StorageError> {
        Ok(store::find_job(&self.store.get_all()?, id).cloned())
    }

    pub fn create(
        &mut self,
        fields: JobFields,
        today: chrono::NaiveDate,
    ) -> Result<JobApplication, MutationError> {
        validate(&fields).map_err(MutationError::Invalid)?;
        let ids = self.ids.as_mut();
        let job = self.store.modify(|jobs| {
            let (next, job) = store::create_job(jobs, fields, ids, today);
            Ok::<_, MutationError>((Some(next), job))
        })?;
        info!(job_id = %job.id, company = %job.company_name, "job created");
        Ok(job)
    }

    /// Patch `id`. The patched record must still pass form validation.
    pub fn update(&mut self, id: &JobId, patch: &JobPatch) -> Result<JobApplication, MutationError> {
        let updated = self.store.modify(|jobs| {
            let next = store::update_job(jobs, id, patch)?;
            let updated = store::find_job(&next, id)
                .cloned()
                .ok_or_else(|| BoardError::JobNotFound { id: id.clone() })?;
            validate(&updated.fields()).map_err(MutationError::Invalid)?;
            Ok::<_, MutationError>((Some(next), updated))
        })?;
        info!(job_id = %id, "job updated");
        Ok(updated)
    }

    /// Drag `id` onto `stage`'s column. A drop on the origin column commits nothing.
    pub fn move_to(&mut self, id: &JobId, stage: Stage) -> Result<MoveResult, MutationError> {
        let result = self.store.modify(|jobs| {
            let job = store::find_job(jobs, id)
                .cloned()
                .ok_or_else(|| BoardError::JobNotFound { id: id.clone() })?;

            let mut drag = DragController::new();
            drag.begin(&job);
            let from = job.status;
            match drag.drop_on(stage, jobs) {
                DropOutcome::Moved(next) => {
                    let moved = store::find_job(&next, id).cloned().unwrap_or(job);
                    let result = MoveResult {
                        job: moved,
                        from,
                        moved: true,
                    };
                    Ok::<_, MutationError>((Some(next), result))
                }
                DropOutcome::Unchanged => Ok((
                    None,
                    MoveResult {
                        job,
                        from,
                        moved: false,
                    },
                )),
            }
        })?;

        if result.moved {
            info!(job_id = %id, from = %result.from, to = %stage, "job moved");
        } else {
            debug!(job_id = %id, stage = %stage, "move to current stage ignored");
        }
        Ok(result)
    }

    /// Remove `id`. Returns whether it was present.
    pub fn delete(&mut self, id: &JobId) -> Result<bool, MutationError> {
        let deleted = self.store.modify(|jobs| {
            if store::find_job(jobs, id).is_none() {
                return Ok::<_, MutationError>((None, false));
            }
            Ok((Some(store::delete_job(jobs, id)), true))
        })?;
        if deleted {
            info!(job_id = %id, "job deleted");
        } else {
            debug!(job_id = %id, "delete of unknown job ignored");
        }
        Ok(deleted)
    }
}

/// Async-safe handle to the board state.
///
/// Wraps `BoardState` behind `Arc<Mutex>` and runs every access on tokio's
/// blocking pool, since the file-backed store writes synchronously. The
/// mutex makes each request a single writer over the collection.
#[derive(Clone)]
pub struct BoardHandle {
    inner: Arc<std::sync::Mutex<BoardState>>,
}

impl BoardHandle {
    pub fn new(state: BoardState) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(state)),
        }
    }

    /// Run a closure with exclusive access to the board on a blocking thread.
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut BoardState) -> R + Send + 'static,
        R: Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = inner
                .lock()
                .map_err(|e| anyhow::anyhow!("Board lock poisoned: {}", e))?;
            Ok(f(&mut guard))
        })
        .await
        .context("Board task panicked")?
    }
}
