//! The caller-owned job collection and the pure operations over it.
//!
//! Nothing here mutates a record in place: every operation takes the current
//! collection and returns a new one, which the caller hands to
//! [`JobStore::replace_all`].

use std::collections::HashMap;

use chrono::NaiveDate;

use super::ids::IdGenerator;
use super::models::{JobApplication, JobFields, JobId, JobPatch, Stage, StageInfo};
use crate::errors::{BoardError, StorageError};

/// Holder of the authoritative collection.
///
/// Reads and writes can fail for a persisting holder. Either way a failed
/// `replace_all` leaves the previous collection in place.
pub trait JobStore {
    fn get_all(&mut self) -> Result<Vec<JobApplication>, StorageError>;
    fn replace_all(&mut self, jobs: Vec<JobApplication>) -> Result<(), StorageError>;

    /// Read the collection, let `f` compute the next one, and write it back
    /// as a single step. `f` returns `None` to leave the collection as is.
    ///
    /// Holders shared between processes override this so no other writer
    /// can land between the read and the write.
    fn modify<R, E>(
        &mut self,
        f: impl FnOnce(&[JobApplication]) -> Result<(Option<Vec<JobApplication>>, R), E>,
    ) -> Result<R, E>
    where
        E: From<StorageError>,
    {
        let jobs = self.get_all()?;
        let (next, out) = f(&jobs)?;
        if let Some(next) = next {
            self.replace_all(next)?;
        }
        Ok(out)
    }
}

/// Plain in-memory store. Ephemeral state is a valid caller choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    jobs: Vec<JobApplication>,
}

impl MemoryStore {
    pub fn new(jobs: Vec<JobApplication>) -> Self {
        Self { jobs }
    }

    pub fn jobs(&self) -> &[JobApplication] {
        &self.jobs
    }
}

impl JobStore for MemoryStore {
    fn get_all(&mut self) -> Result<Vec<JobApplication>, StorageError> {
        Ok(self.jobs.clone())
    }

    fn replace_all(&mut self, jobs: Vec<JobApplication>) -> Result<(), StorageError> {
        self.jobs = jobs;
        Ok(())
    }
}

/// Jobs grouped by stage. Every registered stage has a bucket, empty or not.
pub type Partition = HashMap<Stage, Vec<JobApplication>>;

/// Split `jobs` into one bucket per stage in a single pass, keeping
/// collection order inside each bucket.
pub fn partition_by_stage(jobs: &[JobApplication], stages: &[StageInfo]) -> Partition {
    let mut buckets: Partition = stages.iter().map(|s| (s.id, Vec::new())).collect();
    for job in jobs {
        buckets.entry(job.status).or_default().push(job.clone());
    }
    buckets
}

/// Number of jobs currently in `stage` (the column badge).
pub fn count_by_stage(jobs: &[JobApplication], stage: Stage) -> usize {
    jobs.iter().filter(|j| j.status == stage).count()
}

pub fn find_job<'a>(jobs: &'a [JobApplication], id: &JobId) -> Option<&'a JobApplication> {
    jobs.iter().find(|j| &j.id == id)
}

/// Replace the status of `id`, leaving its position and other fields alone.
/// An unknown id yields an identical copy.
pub fn reassign_stage(jobs: &[JobApplication], id: &JobId, stage: Stage) -> Vec<JobApplication> {
    jobs.iter()
        .map(|job| {
            if &job.id == id {
                JobApplication {
                    status: stage,
                    ..job.clone()
                }
            } else {
                job.clone()
            }
        })
        .collect()
}

/// Append a new job built from `fields`. The id is drawn from `ids` until it
/// differs from every id in `jobs`; the application date is `today`.
pub fn create_job(
    jobs: &[JobApplication],
    fields: JobFields,
    ids: &mut dyn IdGenerator,
    today: NaiveDate,
) -> (Vec<JobApplication>, JobApplication) {
    let mut id = ids.next_id();
    while find_job(jobs, &id).is_some() {
        id = ids.next_id();
    }

    let job = JobApplication {
        id,
        company_name: fields.company_name,
        position_title: fields.position_title,
        status: fields.status,
        application_date: today,
        location: fields.location,
        salary_range: fields.salary_range,
        notes: fields.notes,
    };

    let mut next = jobs.to_vec();
    next.push(job.clone());
    (next, job)
}

/// Apply `patch` to the job with `id`. A missing id is a caller error and
/// leaves the collection untouched.
pub fn update_job(
    jobs: &[JobApplication],
    id: &JobId,
    patch: &JobPatch,
) -> Result<Vec<JobApplication>, BoardError> {
    if find_job(jobs, id).is_none() {
        return Err(BoardError::JobNotFound { id: id.clone() });
    }
    Ok(jobs
        .iter()
        .map(|job| {
            let mut job = job.clone();
            if &job.id == id {
                patch.apply_to(&mut job);
            }
            job
        })
        .collect())
}

/// Remove the job with `id`. Removing an id that is not present is a no-op.
pub fn delete_job(jobs: &[JobApplication], id: &JobId) -> Vec<JobApplication> {
    jobs.iter().filter(|j| &j.id != id).cloned().collect()
}
