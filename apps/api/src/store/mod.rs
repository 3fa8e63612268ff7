//! Data-source seams. Every handler reaches persistence through these traits,
//! carried in `AppState` as `Arc<dyn ...>`.
//!
//! Backends: PostgreSQL (`postgres`), Redis (`kv`), S3 (`files`) and an
//! in-memory set (`memory`) used for local runs and tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::listings::criteria::Criteria;
use crate::listings::filter::filter_jobs;
use crate::models::alert::{Alert, AlertId, AlertPatch, NewAlert};
use crate::models::application::{Application, ApplicationId, NewApplication};
use crate::models::job::{Job, JobId, NewJob};
use crate::models::resume::{NewResume, Resume, ResumeFile, ResumeId, ResumeProfile};

pub mod files;
pub mod kv;
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Every job, newest first.
    async fn list(&self) -> Result<Vec<Job>, AppError>;

    async fn get(&self, id: JobId) -> Result<Job, AppError>;

    /// Featured jobs only, newest first, at most `limit`.
    async fn featured(&self, limit: usize) -> Result<Vec<Job>, AppError>;

    async fn create(&self, job: NewJob) -> Result<Job, AppError>;

    /// `false` when no job had that id.
    async fn delete(&self, id: JobId) -> Result<bool, AppError>;

    /// Snapshot of all jobs run through the listing filter.
    async fn list_matching(&self, criteria: &Criteria) -> Result<Vec<Job>, AppError> {
        let jobs = self.list().await?;
        Ok(filter_jobs(&jobs, criteria))
    }
}

#[async_trait]
pub trait ApplicationSource: Send + Sync {
    /// A user's applications, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Application>, AppError>;

    /// Fails with `Validation` if the user already applied to the job.
    async fn create(&self, application: NewApplication) -> Result<Application, AppError>;

    async fn get(&self, id: ApplicationId) -> Result<Application, AppError>;
}

#[async_trait]
pub trait ResumeSource: Send + Sync {
    /// A user's resumes, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;

    /// The first resume a user registers becomes their default.
    async fn create(&self, resume: NewResume) -> Result<Resume, AppError>;

    async fn get(&self, id: ResumeId) -> Result<Resume, AppError>;

    /// Marks `id` as the user's default and clears the flag everywhere else.
    async fn set_default(&self, id: ResumeId, user_id: Uuid) -> Result<Resume, AppError>;

    /// `false` when no resume had that id. Deleting the default promotes the
    /// user's newest remaining resume.
    async fn delete(&self, id: ResumeId) -> Result<bool, AppError>;

    async fn download(&self, id: ResumeId) -> Result<ResumeFile, AppError>;

    async fn get_profile(&self, id: ResumeId) -> Result<ResumeProfile, AppError> {
        self.get(id)
            .await?
            .profile
            .ok_or_else(|| AppError::NotFound(format!("Profile data not available for resume {id}")))
    }

    async fn default_for(&self, user_id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.list(user_id).await?.into_iter().find(|r| r.is_default))
    }
}

#[async_trait]
pub trait AlertSource: Send + Sync {
    /// All alerts, newest first.
    async fn list(&self) -> Result<Vec<Alert>, AppError>;

    async fn get(&self, id: AlertId) -> Result<Alert, AppError>;

    async fn create(&self, alert: NewAlert) -> Result<Alert, AppError>;

    async fn update(&self, id: AlertId, patch: AlertPatch) -> Result<Alert, AppError>;

    async fn toggle_active(&self, id: AlertId) -> Result<Alert, AppError>;

    async fn delete(&self, id: AlertId) -> Result<bool, AppError>;

    /// Stores the outcome of a match check.
    async fn record_check(
        &self,
        id: AlertId,
        match_count: i64,
        checked_at: DateTime<Utc>,
    ) -> Result<Alert, AppError>;
}

/// String key-value persistence that outlives the process.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: String) -> Result<(), AppError>;
}

/// Read access to uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn fetch(&self, file_ref: &str) -> Result<Bytes, AppError>;
}

fn job_not_found(id: JobId) -> AppError {
    AppError::NotFound(format!("Job {id} not found"))
}

fn application_not_found(id: ApplicationId) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

fn resume_not_found(id: ResumeId) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

fn alert_not_found(id: AlertId) -> AppError {
    AppError::NotFound(format!("Alert {id} not found"))
}

fn already_applied(job_id: JobId) -> AppError {
    AppError::Validation(format!("You have already applied to job {job_id}"))
}
