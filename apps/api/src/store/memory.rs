//! In-memory data sources. Each instance owns its own tables; nothing is
//! shared between instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    alert_not_found, already_applied, application_not_found, job_not_found, resume_not_found,
    AlertSource, ApplicationSource, FileStore, JobSource, ResumeSource,
};
use crate::errors::AppError;
use crate::listings::criteria::normalize_job_type;
use crate::listings::filter::sort_newest_first;
use crate::models::alert::{Alert, AlertId, AlertPatch, NewAlert};
use crate::models::application::{
    Application, ApplicationId, ApplicationStatus, NewApplication,
};
use crate::models::job::{Job, JobId, NewJob};
use crate::models::resume::{NewResume, Resume, ResumeFile, ResumeId};

/// Rows keyed by a sequential id.
#[derive(Debug)]
struct MemoryTable<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T: Clone> MemoryTable<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

impl<T: Clone> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryJobSource {
    table: RwLock<MemoryTable<Job>>,
}

impl MemoryJobSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the table with jobs that already carry ids.
    #[cfg(test)]
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let next_id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        let rows = jobs.into_iter().map(|j| (j.id, j)).collect();
        Self {
            table: RwLock::new(MemoryTable { rows, next_id }),
        }
    }
}

#[async_trait]
impl JobSource for MemoryJobSource {
    async fn list(&self) -> Result<Vec<Job>, AppError> {
        let mut jobs: Vec<Job> = self.table.read().await.values().cloned().collect();
        sort_newest_first(&mut jobs);
        Ok(jobs)
    }

    async fn get(&self, id: JobId) -> Result<Job, AppError> {
        self.table.read().await.get(id).ok_or_else(|| job_not_found(id))
    }

    async fn featured(&self, limit: usize) -> Result<Vec<Job>, AppError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|j| j.featured)
            .take(limit)
            .collect())
    }

    async fn create(&self, job: NewJob) -> Result<Job, AppError> {
        let now = Utc::now();
        Ok(self.table.write().await.insert_with(|id| Job {
            id,
            title: job.title,
            company: job.company,
            location: job.location,
            job_type: normalize_job_type(&job.job_type),
            salary: job.salary,
            description: job.description,
            requirements: job.requirements,
            benefits: job.benefits,
            posted: job.posted.unwrap_or(now),
            deadline: job.deadline,
            industry: job.industry,
            featured: job.featured,
        }))
    }

    async fn delete(&self, id: JobId) -> Result<bool, AppError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryApplicationSource {
    table: RwLock<MemoryTable<Application>>,
}

impl MemoryApplicationSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationSource for MemoryApplicationSource {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Application>, AppError> {
        let mut applications: Vec<Application> = self
            .table
            .read()
            .await
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    async fn create(&self, application: NewApplication) -> Result<Application, AppError> {
        let mut table = self.table.write().await;
        let duplicate = table
            .values()
            .any(|a| a.user_id == application.user_id && a.job_id == application.job_id);
        if duplicate {
            return Err(already_applied(application.job_id));
        }
        let applied_at = Utc::now();
        Ok(table.insert_with(|id| Application {
            id,
            job_id: application.job_id,
            user_id: application.user_id,
            status: ApplicationStatus::Submitted,
            applied_at,
            resume_id: application.resume_id,
            cover_letter: application.cover_letter,
        }))
    }

    async fn get(&self, id: ApplicationId) -> Result<Application, AppError> {
        self.table
            .read()
            .await
            .get(id)
            .ok_or_else(|| application_not_found(id))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

pub struct MemoryResumeSource {
    table: RwLock<MemoryTable<Resume>>,
    files: Arc<dyn FileStore>,
}

impl MemoryResumeSource {
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self {
            table: RwLock::new(MemoryTable::new()),
            files,
        }
    }
}

fn clear_defaults(table: &mut MemoryTable<Resume>, user_id: Uuid) {
    for resume in table.rows.values_mut().filter(|r| r.user_id == user_id) {
        resume.is_default = false;
    }
}

#[async_trait]
impl ResumeSource for MemoryResumeSource {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut resumes: Vec<Resume> = self
            .table
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        Ok(resumes)
    }

    async fn create(&self, resume: NewResume) -> Result<Resume, AppError> {
        let mut table = self.table.write().await;
        let first_for_user = !table.values().any(|r| r.user_id == resume.user_id);
        let is_default = resume.is_default || first_for_user;
        if is_default {
            clear_defaults(&mut table, resume.user_id);
        }
        let uploaded_at = Utc::now();
        Ok(table.insert_with(|id| Resume {
            id,
            user_id: resume.user_id,
            filename: resume.filename,
            uploaded_at,
            file_ref: resume.file_ref,
            is_default,
            profile: resume.profile,
        }))
    }

    async fn get(&self, id: ResumeId) -> Result<Resume, AppError> {
        self.table
            .read()
            .await
            .get(id)
            .ok_or_else(|| resume_not_found(id))
    }

    async fn set_default(&self, id: ResumeId, user_id: Uuid) -> Result<Resume, AppError> {
        let mut table = self.table.write().await;
        match table.rows.get(&id) {
            Some(resume) if resume.user_id == user_id => {}
            _ => return Err(resume_not_found(id)),
        }
        clear_defaults(&mut table, user_id);
        let resume = table.rows.get_mut(&id).ok_or_else(|| resume_not_found(id))?;
        resume.is_default = true;
        Ok(resume.clone())
    }

    async fn delete(&self, id: ResumeId) -> Result<bool, AppError> {
        let mut table = self.table.write().await;
        let Some(removed) = table.rows.remove(&id) else {
            return Ok(false);
        };
        if removed.is_default {
            let newest = table
                .rows
                .values_mut()
                .filter(|r| r.user_id == removed.user_id)
                .max_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then(a.id.cmp(&b.id)));
            if let Some(resume) = newest {
                resume.is_default = true;
            }
        }
        Ok(true)
    }

    async fn download(&self, id: ResumeId) -> Result<ResumeFile, AppError> {
        let resume = self.get(id).await?;
        let bytes = self.files.fetch(&resume.file_ref).await?;
        Ok(ResumeFile::new(&resume, bytes))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Alerts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryAlertSource {
    table: RwLock<MemoryTable<Alert>>,
}

impl MemoryAlertSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(
        &self,
        id: AlertId,
        change: impl FnOnce(&mut Alert) + Send,
    ) -> Result<Alert, AppError> {
        let mut table = self.table.write().await;
        let alert = table.rows.get_mut(&id).ok_or_else(|| alert_not_found(id))?;
        change(alert);
        Ok(alert.clone())
    }
}

#[async_trait]
impl AlertSource for MemoryAlertSource {
    async fn list(&self) -> Result<Vec<Alert>, AppError> {
        let mut alerts: Vec<Alert> = self.table.read().await.values().cloned().collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    async fn get(&self, id: AlertId) -> Result<Alert, AppError> {
        self.table
            .read()
            .await
            .get(id)
            .ok_or_else(|| alert_not_found(id))
    }

    async fn create(&self, alert: NewAlert) -> Result<Alert, AppError> {
        let now = Utc::now();
        Ok(self
            .table
            .write()
            .await
            .insert_with(|id| alert.into_alert(id, now)))
    }

    async fn update(&self, id: AlertId, patch: AlertPatch) -> Result<Alert, AppError> {
        let now = Utc::now();
        self.modify(id, |alert| alert.apply(patch, now)).await
    }

    async fn toggle_active(&self, id: AlertId) -> Result<Alert, AppError> {
        let now = Utc::now();
        self.modify(id, |alert| alert.toggle_active(now)).await
    }

    async fn delete(&self, id: AlertId) -> Result<bool, AppError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn record_check(
        &self,
        id: AlertId,
        match_count: i64,
        checked_at: DateTime<Utc>,
    ) -> Result<Alert, AppError> {
        self.modify(id, |alert| alert.record_check(match_count, checked_at))
            .await
    }
}
