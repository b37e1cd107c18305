//! Drag-and-drop stage reassignment.
//!
//! One gesture at a time:
//!
//! ```text
//! Idle ──begin(job)──> Dragging(job) ──drop_on(stage)──> Idle
//!                           │
//!                           └──cancel()──> Idle
//! ```
//!
//! The collection is only touched by a drop on a column other than the
//! card's origin. Any non-terminal UI (keyboard "move" command, CLI, HTTP)
//! drives the same `begin / accepts / drop_on / cancel` sequence.

use tracing::debug;

use super::models::{JobApplication, JobId, Stage};
use super::store::{find_job, reassign_stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { job_id: JobId, origin: Stage },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing to commit: no drag in progress, self-drop, or the record is gone.
    Unchanged,
    /// New collection with the dragged record's status replaced.
    Moved(Vec<JobApplication>),
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start dragging `job`'s card. No collection change yet.
    pub fn begin(&mut self, job: &JobApplication) {
        debug!(job_id = %job.id, origin = %job.status, "drag started");
        self.state = DragState::Dragging {
            job_id: job.id.clone(),
            origin: job.status,
        };
    }

    /// Whether the column for `stage` takes the drop. Every column accepts
    /// every record.
    pub fn accepts(&self, _stage: Stage) -> bool {
        true
    }

    /// Finish the gesture on the column for `stage`. Always returns to Idle.
    ///
    /// The comparison uses the record's status in `jobs`, so a record edited
    /// mid-drag is judged by its current stage.
    pub fn drop_on(&mut self, stage: Stage, jobs: &[JobApplication]) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { job_id, origin } = state else {
            return DropOutcome::Unchanged;
        };

        match find_job(jobs, &job_id) {
            Some(job) if job.status != stage => {
                debug!(job_id = %job_id, %origin, from = %job.status, to = %stage, "drop committed");
                DropOutcome::Moved(reassign_stage(jobs, &job_id, stage))
            }
            Some(_) if origin != stage => {
                debug!(job_id = %job_id, %origin, stage = %stage, "dropped on column the job was moved to mid-drag");
                DropOutcome::Unchanged
            }
            Some(_) => {
                debug!(job_id = %job_id, stage = %stage, "dropped on origin column");
                DropOutcome::Unchanged
            }
            None => {
                debug!(job_id = %job_id, "dragged job no longer exists");
                DropOutcome::Unchanged
            }
        }
    }

    /// Abandon the gesture (escape, drop outside any column).
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}
