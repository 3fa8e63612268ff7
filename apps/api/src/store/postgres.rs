//! PostgreSQL data sources. Schema lives in `migrations/`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    alert_not_found, already_applied, application_not_found, job_not_found, resume_not_found,
    AlertSource, ApplicationSource, FileStore, JobSource, ResumeSource,
};
use crate::errors::AppError;
use crate::listings::criteria::normalize_job_type;
use crate::models::alert::{Alert, AlertId, AlertPatch, AlertRow, NewAlert};
use crate::models::application::{
    Application, ApplicationId, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::models::job::{Job, JobId, JobRow, NewJob};
use crate::models::resume::{NewResume, Resume, ResumeFile, ResumeId, ResumeRow};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobSource {
    pool: PgPool,
}

impl PgJobSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobSource for PgJobSource {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY posted DESC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: JobId) -> Result<Job, AppError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Job::from)
            .ok_or_else(|| job_not_found(id))
    }

    #[instrument(skip(self))]
    async fn featured(&self, limit: usize) -> Result<Vec<Job>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE featured ORDER BY posted DESC, id ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    #[instrument(skip(self, job), fields(title = %job.title))]
    async fn create(&self, job: NewJob) -> Result<Job, AppError> {
        let salary = job.salary.unwrap_or_default();
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (title, company, location, job_type, salary_min, salary_max, description,
                 requirements, benefits, posted, deadline, industry, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(normalize_job_type(&job.job_type))
        .bind(salary.min)
        .bind(salary.max)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(job.posted.unwrap_or_else(Utc::now))
        .bind(job.deadline)
        .bind(&job.industry)
        .bind(job.featured)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job {}", row.id);
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: JobId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Validation(format!("Job {id} has applications and cannot be deleted"))
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

pub struct PgApplicationSource {
    pool: PgPool,
}

impl PgApplicationSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationSource for PgApplicationSource {
    #[instrument(skip(self))]
    async fn list(&self, user_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY applied_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| Application::try_from(row).map_err(AppError::Internal))
            .collect()
    }

    #[instrument(skip(self, application), fields(job_id = application.job_id, user_id = %application.user_id))]
    async fn create(&self, application: NewApplication) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (job_id, user_id, status, resume_id, cover_letter)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(application.job_id)
        .bind(application.user_id)
        .bind(ApplicationStatus::Submitted.as_str())
        .bind(application.resume_id)
        .bind(&application.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                already_applied(application.job_id)
            } else {
                AppError::Database(e)
            }
        })?;

        info!("Application {} submitted", row.id);
        Ok(row.try_into()?)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: ApplicationId) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| application_not_found(id))?;
        Ok(row.try_into()?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// Transaction-scoped advisory lock on one user's resumes. Every write that
/// touches `is_default` takes it first, so writers for a user run one at a time.
async fn lock_user_resumes(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub struct PgResumeSource {
    pool: PgPool,
    files: Arc<dyn FileStore>,
}

impl PgResumeSource {
    pub fn new(pool: PgPool, files: Arc<dyn FileStore>) -> Self {
        Self { pool, files }
    }
}

#[async_trait]
impl ResumeSource for PgResumeSource {
    #[instrument(skip(self))]
    async fn list(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    #[instrument(skip(self, resume), fields(user_id = %resume.user_id))]
    async fn create(&self, resume: NewResume) -> Result<Resume, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user_resumes(&mut tx, resume.user_id).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(resume.user_id)
            .fetch_one(&mut *tx)
            .await?;
        let is_default = resume.is_default || existing == 0;

        if is_default {
            sqlx::query("UPDATE resumes SET is_default = FALSE WHERE user_id = $1")
                .bind(resume.user_id)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (user_id, filename, file_ref, is_default, profile)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(resume.user_id)
        .bind(&resume.filename)
        .bind(&resume.file_ref)
        .bind(is_default)
        .bind(resume.profile.map(Json))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Registered resume {} (default: {})", row.id, row.is_default);
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: ResumeId) -> Result<Resume, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Resume::from)
            .ok_or_else(|| resume_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_default(&self, id: ResumeId, user_id: Uuid) -> Result<Resume, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user_resumes(&mut tx, user_id).await?;

        let owned: Option<i64> =
            sqlx::query_scalar("SELECT id FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Err(resume_not_found(id));
        }

        // Clear first: the partial unique index is checked row by row.
        sqlx::query("UPDATE resumes SET is_default = FALSE WHERE user_id = $1 AND id <> $2")
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let row = sqlx::query_as::<_, ResumeRow>(
            "UPDATE resumes SET is_default = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ResumeId) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(user_id) = owner else {
            return Ok(false);
        };
        lock_user_resumes(&mut tx, user_id).await?;

        let was_default: Option<bool> =
            sqlx::query_scalar("DELETE FROM resumes WHERE id = $1 RETURNING is_default")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        AppError::Validation(format!(
                            "Resume {id} is attached to applications and cannot be deleted"
                        ))
                    } else {
                        AppError::Database(e)
                    }
                })?;
        let Some(was_default) = was_default else {
            return Ok(false);
        };

        if was_default {
            sqlx::query(
                r#"
                UPDATE resumes SET is_default = TRUE
                WHERE id = (
                    SELECT id FROM resumes WHERE user_id = $1
                    ORDER BY uploaded_at DESC, id DESC
                    LIMIT 1
                )
                "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Deleted resume {} (was default: {})", id, was_default);
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn download(&self, id: ResumeId) -> Result<ResumeFile, AppError> {
        let resume = self.get(id).await?;
        let bytes = self.files.fetch(&resume.file_ref).await?;
        Ok(ResumeFile::new(&resume, bytes))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Alerts
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAlertSource {
    pool: PgPool,
}

impl PgAlertSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertSource for PgAlertSource {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Alert>, AppError> {
        let rows =
            sqlx::query_as::<_, AlertRow>("SELECT * FROM alerts ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .map(|row| Alert::try_from(row).map_err(AppError::Internal))
            .collect()
    }

    #[instrument(skip(self))]
    async fn get(&self, id: AlertId) -> Result<Alert, AppError> {
        let row = sqlx::query_as::<_, AlertRow>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| alert_not_found(id))?;
        Ok(row.try_into()?)
    }

    #[instrument(skip(self, alert), fields(name = %alert.name))]
    async fn create(&self, alert: NewAlert) -> Result<Alert, AppError> {
        // The id is assigned by the sequence; 0 is a placeholder.
        let draft = alert.into_alert(0, Utc::now());
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            INSERT INTO alerts
                (name, title, location, industry, job_type, salary, frequency,
                 is_active, match_count, created_at, last_checked, last_modified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.criteria.title)
        .bind(&draft.criteria.location)
        .bind(&draft.criteria.industry)
        .bind(&draft.criteria.job_type)
        .bind(&draft.criteria.salary)
        .bind(draft.frequency.as_str())
        .bind(draft.is_active)
        .bind(draft.match_count)
        .bind(draft.created_at)
        .bind(draft.last_checked)
        .bind(draft.last_modified)
        .fetch_one(&self.pool)
        .await?;

        info!("Created alert {}", row.id);
        Ok(row.try_into()?)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: AlertId, patch: AlertPatch) -> Result<Alert, AppError> {
        let mut alert = self.get(id).await?;
        alert.apply(patch, Utc::now());

        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            UPDATE alerts
            SET name = $2, title = $3, location = $4, industry = $5, job_type = $6,
                salary = $7, frequency = $8, is_active = $9, last_modified = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&alert.name)
        .bind(&alert.criteria.title)
        .bind(&alert.criteria.location)
        .bind(&alert.criteria.industry)
        .bind(&alert.criteria.job_type)
        .bind(&alert.criteria.salary)
        .bind(alert.frequency.as_str())
        .bind(alert.is_active)
        .bind(alert.last_modified)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| alert_not_found(id))?;
        Ok(row.try_into()?)
    }

    #[instrument(skip(self))]
    async fn toggle_active(&self, id: AlertId) -> Result<Alert, AppError> {
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            UPDATE alerts SET is_active = NOT is_active, last_modified = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| alert_not_found(id))?;
        Ok(row.try_into()?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: AlertId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn record_check(
        &self,
        id: AlertId,
        match_count: i64,
        checked_at: DateTime<Utc>,
    ) -> Result<Alert, AppError> {
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            UPDATE alerts SET match_count = $2, last_checked = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(match_count)
        .bind(checked_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| alert_not_found(id))?;
        Ok(row.try_into()?)
    }
}
