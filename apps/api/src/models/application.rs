use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::JobId;
use crate::models::resume::ResumeId;

pub type ApplicationId = i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Submitted,
    Viewed,
    Interview,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Viewed => "viewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "viewed" => Ok(ApplicationStatus::Viewed),
            "interview" => Ok(ApplicationStatus::Interview),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "accepted" => Ok(ApplicationStatus::Accepted),
            other => Err(anyhow!("unknown application status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub resume_id: ResumeId,
    pub cover_letter: String,
}

/// Per-status counts over one user's applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub submitted: usize,
    pub viewed: usize,
    pub interview: usize,
    pub rejected: usize,
    pub accepted: usize,
}

impl ApplicationSummary {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut summary = ApplicationSummary {
            total: applications.len(),
            ..Default::default()
        };
        for application in applications {
            let slot = match application.status {
                ApplicationStatus::Submitted => &mut summary.submitted,
                ApplicationStatus::Viewed => &mut summary.viewed,
                ApplicationStatus::Interview => &mut summary.interview,
                ApplicationStatus::Rejected => &mut summary.rejected,
                ApplicationStatus::Accepted => &mut summary.accepted,
            };
            *slot += 1;
        }
        summary
    }
}

/// What the applicant submits. `resume_id` falls back to the default resume.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyRequest {
    pub job_id: JobId,
    pub user_id: Uuid,
    #[serde(default)]
    pub resume_id: Option<ResumeId>,
    #[serde(default)]
    pub cover_letter: String,
}

/// A fully resolved application ready to be stored.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: JobId,
    pub user_id: Uuid,
    pub resume_id: ResumeId,
    pub cover_letter: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub user_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub resume_id: i64,
    pub cover_letter: String,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = anyhow::Error;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            user_id: row.user_id,
            status: row.status.parse()?,
            applied_at: row.applied_at,
            resume_id: row.resume_id,
            cover_letter: row.cover_letter,
        })
    }
}
