use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type JobId = i64;

/// Salary bounds as advertised. Either side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Stored normalized: `"full time"`, `"part time"`, `"contract"`, ...
    pub job_type: String,
    pub salary: Option<SalaryRange>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub posted: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub industry: String,
    pub featured: bool,
}

impl Job {
    pub fn salary_min(&self) -> Option<i64> {
        self.salary.and_then(|s| s.min)
    }
}

/// Payload for creating a job listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Defaults to the creation time.
    #[serde(default)]
    pub posted: Option<DateTime<Utc>>,
    pub deadline: DateTime<Utc>,
    pub industry: String,
    #[serde(default)]
    pub featured: bool,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("job_type", &self.job_type),
            ("industry", &self.industry),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} cannot be empty"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub posted: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub industry: String,
    pub featured: bool,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        let salary = match (row.salary_min, row.salary_max) {
            (None, None) => None,
            (min, max) => Some(SalaryRange { min, max }),
        };
        Job {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            job_type: row.job_type,
            salary,
            description: row.description,
            requirements: row.requirements,
            benefits: row.benefits,
            posted: row.posted,
            deadline: row.deadline,
            industry: row.industry,
            featured: row.featured,
        }
    }
}
