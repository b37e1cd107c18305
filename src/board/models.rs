use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::BoardError;

/// Lifecycle stage of a job application. Doubles as the board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Applied,
    Screening,
    Interview,
    Offer,
    Rejected,
}

impl Stage {
    /// Every stage in presentation (left-to-right) order.
    pub const ALL: [Stage; 5] = [
        Stage::Applied,
        Stage::Screening,
        Stage::Interview,
        Stage::Offer,
        Stage::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Screening => "screening",
            Self::Interview => "interview",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Screening => "Screening",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "applied" => Ok(Self::Applied),
            "screening" => Ok(Self::Screening),
            "interview" => Ok(Self::Interview),
            "offer" => Ok(Self::Offer),
            "rejected" => Ok(Self::Rejected),
            other => Err(BoardError::UnknownStage {
                value: other.to_string(),
                expected: Stage::ALL
                    .iter()
                    .map(Stage::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Display metadata for one column of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInfo {
    pub id: Stage,
    pub display_title: &'static str,
}

/// Opaque identifier of a job application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobId,
    pub company_name: String,
    pub position_title: String,
    pub status: Stage,
    pub application_date: NaiveDate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub notes: String,
}

impl JobApplication {
    /// The editable fields of this record, as the form would pre-fill them.
    pub fn fields(&self) -> JobFields {
        JobFields {
            company_name: self.company_name.clone(),
            position_title: self.position_title.clone(),
            status: self.status,
            location: self.location.clone(),
            salary_range: self.salary_range.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Every field a user can set through the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFields {
    pub company_name: String,
    pub position_title: String,
    pub status: Stage,
    pub location: String,
    pub salary_range: String,
    pub notes: String,
}

/// A partial edit. `None` leaves the field as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    pub company_name: Option<String>,
    pub position_title: Option<String>,
    pub status: Option<Stage>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub notes: Option<String>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields to `job`. Id and application date are never touched.
    pub fn apply_to(&self, job: &mut JobApplication) {
        if let Some(c) = &self.company_name {
            job.company_name = c.clone();
        }
        if let Some(p) = &self.position_title {
            job.position_title = p.clone();
        }
        if let Some(s) = self.status {
            job.status = s;
        }
        if let Some(l) = &self.location {
            job.location = l.clone();
        }
        if let Some(r) = &self.salary_range {
            job.salary_range = r.clone();
        }
        if let Some(n) = &self.notes {
            job.notes = n.clone();
        }
    }

    /// Same as [`JobPatch::apply_to`], for a form draft.
    pub fn apply_to_fields(&self, fields: &mut JobFields) {
        if let Some(c) = &self.company_name {
            fields.company_name = c.clone();
        }
        if let Some(p) = &self.position_title {
            fields.position_title = p.clone();
        }
        if let Some(s) = self.status {
            fields.status = s;
        }
        if let Some(l) = &self.location {
            fields.location = l.clone();
        }
        if let Some(r) = &self.salary_range {
            fields.salary_range = r.clone();
        }
        if let Some(n) = &self.notes {
            fields.notes = n.clone();
        }
    }
}

impl From<JobFields> for JobPatch {
    fn from(fields: JobFields) -> Self {
        Self {
            company_name: Some(fields.company_name),
            position_title: Some(fields.position_title),
            status: Some(fields.status),
            location: Some(fields.location),
            salary_range: Some(fields.salary_range),
            notes: Some(fields.notes),
        }
    }
}

// View types

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub total: usize,
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub stage: Stage,
    pub title: &'static str,
    pub count: usize,
    pub jobs: Vec<JobApplication>,
}

/// Headline numbers for the dashboard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub total: usize,
    pub by_stage: Vec<StageCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}
