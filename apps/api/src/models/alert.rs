use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type AlertId = i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl AlertFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertFrequency::Daily => "daily",
            AlertFrequency::Weekly => "weekly",
            AlertFrequency::Monthly => "monthly",
        }
    }
}

impl FromStr for AlertFrequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(AlertFrequency::Daily),
            "weekly" => Ok(AlertFrequency::Weekly),
            "monthly" => Ok(AlertFrequency::Monthly),
            other => Err(anyhow!("unknown alert frequency '{other}'")),
        }
    }
}

/// Stored match criteria. Empty strings are normalized to `None` on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCriteria {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
}

impl AlertCriteria {
    pub fn normalized(self) -> Self {
        AlertCriteria {
            title: non_empty(self.title),
            location: non_empty(self.location),
            industry: non_empty(self.industry),
            job_type: non_empty(self.job_type),
            salary: non_empty(self.salary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub name: String,
    pub criteria: AlertCriteria,
    pub frequency: AlertFrequency,
    pub is_active: bool,
    /// Size of the match set the last time the alert was checked.
    pub match_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_checked: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAlert {
    pub name: String,
    #[serde(default, flatten)]
    pub criteria: AlertCriteria,
    #[serde(default)]
    pub frequency: AlertFrequency,
}

impl NewAlert {
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)
    }

    /// Builds the stored record. New alerts start active with no matches.
    pub fn into_alert(self, id: AlertId, now: DateTime<Utc>) -> Alert {
        Alert {
            id,
            name: self.name.trim().to_string(),
            criteria: self.criteria.normalized(),
            frequency: self.frequency,
            is_active: true,
            match_count: 0,
            created_at: now,
            last_checked: now,
            last_modified: now,
        }
    }
}

/// Partial update. A field left out stays as it is; an empty criterion clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub frequency: Option<AlertFrequency>,
    pub is_active: Option<bool>,
}

impl AlertPatch {
    pub fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

impl Alert {
    pub fn apply(&mut self, patch: AlertPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(title) = patch.title {
            self.criteria.title = non_empty(Some(title));
        }
        if let Some(location) = patch.location {
            self.criteria.location = non_empty(Some(location));
        }
        if let Some(industry) = patch.industry {
            self.criteria.industry = non_empty(Some(industry));
        }
        if let Some(job_type) = patch.job_type {
            self.criteria.job_type = non_empty(Some(job_type));
        }
        if let Some(salary) = patch.salary {
            self.criteria.salary = non_empty(Some(salary));
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.last_modified = now;
    }

    pub fn toggle_active(&mut self, now: DateTime<Utc>) {
        self.is_active = !self.is_active;
        self.last_modified = now;
    }

    pub fn record_check(&mut self, match_count: i64, checked_at: DateTime<Utc>) {
        self.match_count = match_count;
        self.last_checked = checked_at;
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Alert name cannot be empty".to_string());
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, FromRow)]
pub struct AlertRow {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub frequency: String,
    pub is_active: bool,
    pub match_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_checked: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = anyhow::Error;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: row.id,
            name: row.name,
            criteria: AlertCriteria {
                title: row.title,
                location: row.location,
                industry: row.industry,
                job_type: row.job_type,
                salary: row.salary,
            },
            frequency: row.frequency.parse()?,
            is_active: row.is_active,
            match_count: row.match_count,
            created_at: row.created_at,
            last_checked: row.last_checked,
            last_modified: row.last_modified,
        })
    }
}
