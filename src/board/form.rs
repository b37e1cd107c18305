//! Modal add/edit form.
//!
//! The draft lives entirely inside the controller. Nothing reaches the
//! collection until [`FormController::submit`] succeeds, and
//! [`FormController::cancel`] drops the draft without a trace.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::ids::IdGenerator;
use super::models::{JobApplication, JobFields, JobId, JobPatch};
use super::store::{create_job, update_job};
use crate::errors::BoardError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(JobId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Open { mode: FormMode, draft: JobFields },
}

/// One rejected field. `field` uses the wire (camelCase) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the required fields of a draft.
pub fn validate(draft: &JobFields) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if draft.company_name.trim().is_empty() {
        errors.push(FieldError {
            field: "companyName",
            message: "Company name is required".to_string(),
        });
    }
    if draft.position_title.trim().is_empty() {
        errors.push(FieldError {
            field: "positionTitle",
            message: "Position title is required".to_string(),
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Created {
        jobs: Vec<JobApplication>,
        job: JobApplication,
    },
    Updated {
        jobs: Vec<JobApplication>,
        id: JobId,
    },
}

impl FormOutcome {
    pub fn jobs(&self) -> &[JobApplication] {
        match self {
            Self::Created { jobs, .. } | Self::Updated { jobs, .. } => jobs,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("The form is not open")]
    NotOpen,

    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, Default)]
pub struct FormController {
    state: FormState,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open { .. })
    }

    pub fn mode(&self) -> Option<&FormMode> {
        match &self.state {
            FormState::Open { mode, .. } => Some(mode),
            FormState::Closed => None,
        }
    }

    /// Open the "Add" form with defaults (status `applied`, blank text).
    pub fn open_create(&mut self) {
        self.state = FormState::Open {
            mode: FormMode::Create,
            draft: JobFields::default(),
        };
    }

    /// Open the "Edit" form pre-filled from `job`.
    pub fn open_edit(&mut self, job: &JobApplication) {
        self.state = FormState::Open {
            mode: FormMode::Edit(job.id.clone()),
            draft: job.fields(),
        };
    }

    pub fn draft(&self) -> Option<&JobFields> {
        match &self.state {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut JobFields> {
        match &mut self.state {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    /// Validate and commit the draft against `jobs`.
    ///
    /// On validation failure the form stays open with its draft intact. On a
    /// missing edit target the form also stays open and the collection is
    /// not touched.
    pub fn submit(
        &mut self,
        jobs: &[JobApplication],
        ids: &mut dyn IdGenerator,
        today: NaiveDate,
    ) -> Result<FormOutcome, SubmitError> {
        let FormState::Open { mode, draft } = &self.state else {
            return Err(SubmitError::NotOpen);
        };
        validate(draft).map_err(SubmitError::Invalid)?;

        let outcome = match mode {
            FormMode::Create => {
                let (jobs, job) = create_job(jobs, draft.clone(), ids, today);
                FormOutcome::Created { jobs, job }
            }
            FormMode::Edit(id) => {
                let patch = JobPatch::from(draft.clone());
                let jobs = update_job(jobs, id, &patch)?;
                FormOutcome::Updated {
                    jobs,
                    id: id.clone(),
                }
            }
        };

        self.state = FormState::Closed;
        Ok(outcome)
    }

    /// Close the form and throw the draft away.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("form cancelled, draft discarded");
        }
        self.state = FormState::Closed;
    }
}
