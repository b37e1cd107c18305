//! Job application board — the core.
//!
//! ## Overview
//!
//! The caller owns a `Vec<JobApplication>` and hands it to a [`JobBoard`]
//! together with an `on_change` callback. Every committed interaction
//! (create, edit, delete, drag to another column) computes a **new**
//! collection and passes it to `on_change`; the board then renders from that
//! collection. No-ops (self-drop, cancelled drag, cancelled form, delete of
//! a missing id) never call `on_change`.
//!
//! ## Module Map
//!
//! | Module    | Responsibility                                              |
//! |-----------|-------------------------------------------------------------|
//! | `models`  | `JobApplication`, `Stage`, `JobFields`, `JobPatch`, views   |
//! | `stages`  | The fixed, ordered stage registry                           |
//! | `store`   | `JobStore` trait + pure collection operations               |
//! | `view`    | Column partitioning into a `BoardView`                      |
//! | `drag`    | Drag-and-drop state machine                                 |
//! | `form`    | Modal add/edit form with validation                         |
//! | `ids`     | Id generation (`UuidIds`, `SequentialIds`)                  |
//! | `seed`    | Demo data                                                   |

pub mod drag;
pub mod form;
pub mod ids;
pub mod models;
pub mod seed;
pub mod stages;
pub mod store;
pub mod view;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::errors::BoardError;
use drag::{DragController, DropOutcome};
use form::{FormController, FormOutcome, SubmitError};
use ids::{IdGenerator, UuidIds};
use models::{BoardView, JobApplication, JobFields, JobId, Stage};

/// What a successful form submit committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommit {
    Created(JobApplication),
    Updated(JobId),
}

/// Current calendar date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The interactive board: the caller's collection plus transient drag and
/// form state.
pub struct JobBoard<F>
where
    F: FnMut(Vec<JobApplication>),
{
    jobs: Vec<JobApplication>,
    on_change: F,
    drag: DragController,
    form: FormController,
    ids: Box<dyn IdGenerator>,
}

impl<F> JobBoard<F>
where
    F: FnMut(Vec<JobApplication>),
{
    pub fn new(jobs: Vec<JobApplication>, on_change: F) -> Self {
        Self {
            jobs,
            on_change,
            drag: DragController::new(),
            form: FormController::new(),
            ids: Box::new(UuidIds),
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn jobs(&self) -> &[JobApplication] {
        &self.jobs
    }

    /// The caller replaced its collection from elsewhere; render from it.
    pub fn set_jobs(&mut self, jobs: Vec<JobApplication>) {
        self.jobs = jobs;
    }

    pub fn view(&self) -> BoardView {
        view::board_view(&self.jobs)
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    fn commit(&mut self, jobs: Vec<JobApplication>) {
        self.jobs = jobs.clone();
        (self.on_change)(jobs);
    }

    // ── Drag and drop ─────────────────────────────────────────────────

    /// Pick up the card for `id`. Refused while the form is open or when no
    /// such card exists.
    pub fn begin_drag(&mut self, id: &JobId) -> bool {
        if self.form.is_open() {
            debug!(job_id = %id, "drag ignored while form is open");
            return false;
        }
        match store::find_job(&self.jobs, id) {
            Some(job) => {
                self.drag.begin(job);
                true
            }
            None => false,
        }
    }

    pub fn accepts_drop(&self, stage: Stage) -> bool {
        self.drag.accepts(stage)
    }

    /// Drop the dragged card on `stage`'s column. Returns whether a change
    /// was committed.
    pub fn drop_on(&mut self, stage: Stage) -> bool {
        match self.drag.drop_on(stage, &self.jobs) {
            DropOutcome::Moved(jobs) => {
                info!(stage = %stage, "job moved");
                self.commit(jobs);
                true
            }
            DropOutcome::Unchanged => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Drag-and-drop in one call, for non-pointer front ends.
    pub fn move_job(&mut self, id: &JobId, stage: Stage) -> bool {
        if !self.begin_drag(id) {
            return false;
        }
        self.drop_on(stage)
    }

    // ── Form ──────────────────────────────────────────────────────────

    pub fn open_create(&mut self) {
        self.drag.cancel();
        self.form.open_create();
    }

    pub fn open_edit(&mut self, id: &JobId) -> Result<(), BoardError> {
        let job = store::find_job(&self.jobs, id)
            .ok_or_else(|| BoardError::JobNotFound { id: id.clone() })?;
        self.drag.cancel();
        self.form.open_edit(job);
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Option<&mut JobFields> {
        self.form.draft_mut()
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Submit the open form, stamping new records with today's date.
    pub fn submit_form(&mut self) -> Result<FormCommit, SubmitError> {
        self.submit_form_on(today())
    }

    pub fn submit_form_on(&mut self, today: NaiveDate) -> Result<FormCommit, SubmitError> {
        let outcome = self.form.submit(&self.jobs, self.ids.as_mut(), today);
        match outcome {
            Ok(FormOutcome::Created { jobs, job }) => {
                info!(job_id = %job.id, company = %job.company_name, "job created");
                self.commit(jobs);
                Ok(FormCommit::Created(job))
            }
            Ok(FormOutcome::Updated { jobs, id }) => {
                info!(job_id = %id, "job updated");
                self.commit(jobs);
                Ok(FormCommit::Updated(id))
            }
            Err(SubmitError::Board(err)) => {
                warn!(error = %err, "form submit rejected");
                Err(SubmitError::Board(err))
            }
            Err(err) => Err(err),
        }
    }

    // ── Delete ────────────────────────────────────────────────────────

    /// Remove the card for `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &JobId) -> bool {
        if self.form.is_open() {
            debug!(job_id = %id, "delete ignored while form is open");
            return false;
        }
        if store::find_job(&self.jobs, id).is_none() {
            debug!(job_id = %id, "delete of unknown job ignored");
            return false;
        }
        let jobs = store::delete_job(&self.jobs, id);
        info!(job_id = %id, "job deleted");
        self.commit(jobs);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ids::SequentialIds;
    use crate::board::store::tests::{day, job};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Changes = Rc<RefCell<Vec<Vec<JobApplication>>>>;

    fn board_with(
        jobs: Vec<JobApplication>,
    ) -> (JobBoard<impl FnMut(Vec<JobApplication>)>, Changes) {
        let changes: Changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let board = JobBoard::new(jobs, move |next| sink.borrow_mut().push(next))
            .with_id_generator(SequentialIds::default());
        (board, changes)
    }

    #[test]
    fn test_drag_to_interview_commits_new_collection() {
        let (mut board, changes) = board_with(vec![job("1", "TechCorp", Stage::Applied)]);

        assert!(board.begin_drag(&JobId::from("1")));
        assert!(board.accepts_drop(Stage::Interview));
        assert!(board.drop_on(Stage::Interview));

        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            vec![JobApplication {
                status: Stage::Interview,
                ..job("1", "TechCorp", Stage::Applied)
            }]
        );
        assert_eq!(board.jobs(), changes[0].as_slice());
    }

    #[test]
    fn test_self_drop_does_not_notify() {
        let (mut board, changes) = board_with(vec![job("1", "TechCorp", Stage::Applied)]);
        assert!(board.begin_drag(&JobId::from("1")));
        assert!(!board.drop_on(Stage::Applied));
        assert!(changes.borrow().is_empty());
        assert!(!board.drag().is_dragging());
    }

    #[test]
    fn test_cancelled_drag_does_not_notify() {
        let (mut board, changes) = board_with(vec![job("1", "TechCorp", Stage::Applied)]);
        board.begin_drag(&JobId::from("1"));
        board.cancel_drag();
        assert!(!board.drop_on(Stage::Offer));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_add_form_on_empty_board() {
        let (mut board, changes) = board_with(Vec::new());
        board.open_create();
        {
            let draft = board.draft_mut().unwrap();
            draft.company_name = "Acme".into();
            draft.position_title = "Engineer".into();
        }
        let commit = board.submit_form_on(day(2024, 6, 1)).unwrap();
        let FormCommit::Created(created) = commit else {
            panic!("expected Created");
        };
        assert_eq!(created.status, Stage::Applied);
        assert_eq!(created.application_date, day(2024, 6, 1));
        assert_eq!(changes.borrow().len(), 1);
        assert_eq!(board.jobs().len(), 1);
    }

    #[test]
    fn test_submit_stamps_today() {
        let (mut board, _changes) = board_with(Vec::new());
        board.open_create();
        {
            let draft = board.draft_mut().unwrap();
            draft.company_name = "Acme".into();
            draft.position_title = "Engineer".into();
        }
        let before = today();
        board.submit_form().unwrap();
        let after = today();
        let date = board.jobs()[0].application_date;
        assert!(date == before || date == after);
    }

    #[test]
    fn test_invalid_form_does_not_notify() {
        let (mut board, changes) = board_with(Vec::new());
        board.open_create();
        let err = board.submit_form_on(day(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert!(board.form().is_open());
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_cancelled_form_does_not_notify() {
        let (mut board, changes) = board_with(vec![job("1", "TechCorp", Stage::Applied)]);
        board.open_edit(&JobId::from("1")).unwrap();
        board.draft_mut().unwrap().company_name = "Changed".into();
        board.cancel_form();
        assert!(changes.borrow().is_empty());
        assert_eq!(board.jobs()[0].company_name, "TechCorp");
    }

    #[test]
    fn test_edit_form_updates_record() {
        let (mut board, changes) = board_with(vec![
            job("1", "TechCorp", Stage::Applied),
            job("2", "Globex", Stage::Offer),
        ]);
        board.open_edit(&JobId::from("2")).unwrap();
        board.draft_mut().unwrap().notes = "Negotiating".into();
        let commit = board.submit_form_on(day(2024, 6, 1)).unwrap();
        assert_eq!(commit, FormCommit::Updated(JobId::from("2")));
        assert_eq!(board.jobs()[1].notes, "Negotiating");
        assert_eq!(board.jobs()[0], job("1", "TechCorp", Stage::Applied));
        assert_eq!(changes.borrow().len(), 1);
    }

    #[test]
    fn test_open_edit_unknown_id() {
        let (mut board, _changes) = board_with(Vec::new());
        assert!(matches!(
            board.open_edit(&JobId::from("9")),
            Err(BoardError::JobNotFound { .. })
        ));
        assert!(!board.form().is_open());
    }

    #[test]
    fn test_form_is_modal() {
        let (mut board, changes) = board_with(vec![job("1", "TechCorp", Stage::Applied)]);
        board.open_create();
        assert!(!board.begin_drag(&JobId::from("1")));
        assert!(!board.delete(&JobId::from("1")));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_delete_notifies_once_and_ignores_missing() {
        let (mut board, changes) = board_with(vec![
            job("1", "TechCorp", Stage::Applied),
            job("2", "Globex", Stage::Offer),
        ]);
        assert!(board.delete(&JobId::from("1")));
        assert!(!board.delete(&JobId::from("1")));
        assert_eq!(changes.borrow().len(), 1);
        assert_eq!(board.jobs().len(), 1);
        assert_eq!(board.jobs()[0].id, JobId::from("2"));
    }

    #[test]
    fn test_move_job_shortcut() {
        let (mut board, changes) = board_with(vec![job("1", "TechCorp", Stage::Applied)]);
        assert!(board.move_job(&JobId::from("1"), Stage::Rejected));
        assert!(!board.move_job(&JobId::from("1"), Stage::Rejected));
        assert!(!board.move_job(&JobId::from("404"), Stage::Offer));
        assert_eq!(changes.borrow().len(), 1);
        assert_eq!(board.view().columns[4].count, 1);
    }

    #[test]
    fn test_set_jobs_rerenders_from_caller_collection() {
        let (mut board, _changes) = board_with(Vec::new());
        board.set_jobs(vec![job("7", "Initech", Stage::Screening)]);
        assert_eq!(board.view().columns[1].jobs[0].company_name, "Initech");
    }
}
