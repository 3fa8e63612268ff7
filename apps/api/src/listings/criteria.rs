//! Criteria: the optional search/match fields shared by live listing search
//! and stored job alerts.
//!
//! Both call sites evaluate jobs through [`Criteria::predicate`], so the two
//! can never disagree on what "matches" means.

use serde::{Deserialize, Serialize};

use crate::models::alert::AlertCriteria;
use crate::models::job::Job;

/// Optional filter fields. `None` and `Some("")` both impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Case-insensitive substring of title, company or description.
    #[serde(default)]
    pub search: Option<String>,
    /// Case-insensitive substring of location.
    #[serde(default)]
    pub location: Option<String>,
    /// Exact industry.
    #[serde(default)]
    pub industry: Option<String>,
    /// Exact job type, hyphens read as spaces (`full-time` == `full time`).
    #[serde(default)]
    pub job_type: Option<String>,
    /// Salary bucket, `"<min>-<max>"` or `"<min>+"`.
    #[serde(default)]
    pub salary: Option<String>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        [
            &self.search,
            &self.location,
            &self.industry,
            &self.job_type,
            &self.salary,
        ]
        .into_iter()
        .all(|field| provided(field).is_none())
    }

    /// Prepares the predicate once so a collection scan does not re-lowercase
    /// the needles for every job.
    pub fn predicate(&self) -> JobPredicate<'_> {
        JobPredicate {
            search: provided(&self.search).map(str::to_lowercase),
            location: provided(&self.location).map(str::to_lowercase),
            industry: provided(&self.industry),
            job_type: provided(&self.job_type).map(normalize_job_type),
            salary: provided(&self.salary).map(SalaryBucket::parse),
        }
    }

    #[cfg(test)]
    pub fn matches(&self, job: &Job) -> bool {
        self.predicate().matches(job)
    }

    /// Human-readable alert name built from title, location and industry.
    pub fn suggested_alert_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(title) = provided(&self.search) {
            parts.push(title.to_string());
        }
        if let Some(location) = provided(&self.location) {
            parts.push(location.replace('-', " "));
        }
        if let Some(industry) = provided(&self.industry) {
            parts.push(industry.to_string());
        }
        if parts.is_empty() {
            "Job Alert".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Alert criteria prefilled from the current listing filters.
    pub fn to_alert_criteria(&self) -> AlertCriteria {
        AlertCriteria {
            title: self.search.clone(),
            location: self.location.clone(),
            industry: self.industry.clone(),
            job_type: self.job_type.clone(),
            salary: self.salary.clone(),
        }
        .normalized()
    }
}

/// An alert's free-text `title` criterion is the listing search field.
impl From<&AlertCriteria> for Criteria {
    fn from(alert: &AlertCriteria) -> Self {
        Criteria {
            search: alert.title.clone(),
            location: alert.location.clone(),
            industry: alert.industry.clone(),
            job_type: alert.job_type.clone(),
            salary: alert.salary.clone(),
        }
    }
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

pub fn normalize_job_type(raw: &str) -> String {
    raw.replace('-', " ")
}

/// A compiled [`Criteria`], evaluated against one job at a time.
#[derive(Debug, Clone)]
pub struct JobPredicate<'a> {
    search: Option<String>,
    location: Option<String>,
    industry: Option<&'a str>,
    job_type: Option<String>,
    salary: Option<SalaryBucket>,
}

impl JobPredicate<'_> {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(needle) = &self.search {
            let hit = contains_ci(&job.title, needle)
                || contains_ci(&job.company, needle)
                || contains_ci(&job.description, needle);
            if !hit {
                return false;
            }
        }
        if let Some(needle) = &self.location {
            if !contains_ci(&job.location, needle) {
                return false;
            }
        }
        if let Some(industry) = self.industry {
            if job.industry != industry {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if normalize_job_type(&job.job_type) != *job_type {
                return false;
            }
        }
        if let Some(bucket) = &self.salary {
            match job.salary_min() {
                Some(min) if bucket.admits(min) => {}
                _ => return false,
            }
        }
        true
    }
}

/// `needle` must already be lowercase.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Parsed salary filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryBucket {
    /// `"<min>-<max>"`, both bounds inclusive.
    Range { min: i64, max: i64 },
    /// `"<min>+"`.
    AtLeast(i64),
    /// Anything else. Only requires that the job advertises a minimum.
    Malformed,
}

impl SalaryBucket {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(min) = raw.strip_suffix('+') {
            return match min.trim().parse() {
                Ok(min) => SalaryBucket::AtLeast(min),
                Err(_) => SalaryBucket::Malformed,
            };
        }
        match raw.split_once('-') {
            Some((min, max)) => match (min.trim().parse(), max.trim().parse()) {
                (Ok(min), Ok(max)) => SalaryBucket::Range { min, max },
                _ => SalaryBucket::Malformed,
            },
            None => SalaryBucket::Malformed,
        }
    }

    /// Whether a job advertising `salary_min` falls in this bucket.
    pub fn admits(&self, salary_min: i64) -> bool {
        match *self {
            SalaryBucket::Range { min, max } => (min..=max).contains(&salary_min),
            SalaryBucket::AtLeast(min) => salary_min >= min,
            SalaryBucket::Malformed => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::test_support::job;
    use crate::models::job::SalaryRange;

    fn criteria() -> Criteria {
        Criteria::default()
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let c = criteria();
        assert!(c.is_empty());
        assert!(c.matches(&job(1, "Backend Engineer", "technology", "full time", Some(90_000))));
        assert!(c.matches(&job(2, "Sales Rep", "retail", "part time", None)));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let c = Criteria {
            search: Some(String::new()),
            salary: Some(String::new()),
            ..criteria()
        };
        assert!(c.is_empty());
        assert!(c.matches(&job(2, "Sales Rep", "retail", "part time", None)));
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_company_description() {
        let mut j = job(1, "Backend Engineer", "technology", "full time", None);
        j.company = "Acme Robotics".to_string();
        j.description = "Build distributed KAFKA pipelines".to_string();

        for needle in ["backend", "ACME", "kafka"] {
            let c = Criteria {
                search: Some(needle.to_string()),
                ..criteria()
            };
            assert!(c.matches(&j), "expected '{needle}' to match");
        }
        let c = Criteria {
            search: Some("frontend".to_string()),
            ..criteria()
        };
        assert!(!c.matches(&j));
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let mut j = job(1, "Backend Engineer", "technology", "full time", None);
        j.location = "San Francisco, CA".to_string();
        let c = Criteria {
            location: Some("san francisco".to_string()),
            ..criteria()
        };
        assert!(c.matches(&j));
        let c = Criteria {
            location: Some("Austin".to_string()),
            ..criteria()
        };
        assert!(!c.matches(&j));
    }

    #[test]
    fn test_industry_is_exact() {
        let j = job(1, "Backend Engineer", "technology", "full time", None);
        let exact = Criteria {
            industry: Some("technology".to_string()),
            ..criteria()
        };
        let partial = Criteria {
            industry: Some("tech".to_string()),
            ..criteria()
        };
        assert!(exact.matches(&j));
        assert!(!partial.matches(&j));
    }

    #[test]
    fn test_job_type_normalizes_hyphens() {
        let j = job(1, "Backend Engineer", "technology", "full time", None);
        let c = Criteria {
            job_type: Some("full-time".to_string()),
            ..criteria()
        };
        assert!(c.matches(&j));
        let c = Criteria {
            job_type: Some("part-time".to_string()),
            ..criteria()
        };
        assert!(!c.matches(&j));
    }

    #[test]
    fn test_salary_bucket_parsing() {
        assert_eq!(
            SalaryBucket::parse("50000-100000"),
            SalaryBucket::Range {
                min: 50_000,
                max: 100_000
            }
        );
        assert_eq!(SalaryBucket::parse("150000+"), SalaryBucket::AtLeast(150_000));
        assert_eq!(SalaryBucket::parse("lots"), SalaryBucket::Malformed);
        assert_eq!(SalaryBucket::parse("50000-"), SalaryBucket::Malformed);
        assert_eq!(SalaryBucket::parse("+"), SalaryBucket::Malformed);
    }

    #[test]
    fn test_salary_range_is_inclusive() {
        let bucket = SalaryBucket::parse("50000-100000");
        assert!(bucket.admits(50_000));
        assert!(bucket.admits(100_000));
        assert!(!bucket.admits(49_999));
        assert!(!bucket.admits(100_001));
    }

    #[test]
    fn test_salary_plus_has_no_upper_bound() {
        let bucket = SalaryBucket::parse("150000+");
        assert!(bucket.admits(150_000));
        assert!(bucket.admits(900_000));
        assert!(!bucket.admits(149_999));
    }

    #[test]
    fn test_salary_filter_excludes_jobs_without_minimum() {
        let mut j = job(1, "Backend Engineer", "technology", "full time", None);
        j.salary = Some(SalaryRange {
            min: None,
            max: Some(120_000),
        });
        let c = Criteria {
            salary: Some("0-200000".to_string()),
            ..criteria()
        };
        assert!(!c.matches(&j));
    }

    #[test]
    fn test_malformed_salary_only_requires_a_minimum() {
        let c = Criteria {
            salary: Some("competitive".to_string()),
            ..criteria()
        };
        assert!(c.matches(&job(1, "Backend Engineer", "technology", "full time", Some(1))));
        assert!(!c.matches(&job(2, "Sales Rep", "retail", "part time", None)));
    }

    #[test]
    fn test_all_fields_are_conjunctive() {
        let j = job(1, "Backend Engineer", "technology", "full time", Some(90_000));
        let c = Criteria {
            search: Some("engineer".to_string()),
            industry: Some("technology".to_string()),
            job_type: Some("part-time".to_string()),
            ..criteria()
        };
        assert!(!c.matches(&j));
    }

    #[test]
    fn test_suggested_alert_name() {
        let c = Criteria {
            search: Some("Rust".to_string()),
            location: Some("new-york".to_string()),
            industry: Some("finance".to_string()),
            ..criteria()
        };
        assert_eq!(c.suggested_alert_name(), "Rust new york finance");
        assert_eq!(criteria().suggested_alert_name(), "Job Alert");
    }

    #[test]
    fn test_alert_title_maps_to_search() {
        let alert = AlertCriteria {
            title: Some("engineer".to_string()),
            ..Default::default()
        };
        let c = Criteria::from(&alert);
        assert_eq!(c.search.as_deref(), Some("engineer"));
        assert_eq!(c.to_alert_criteria(), alert);
    }
}
