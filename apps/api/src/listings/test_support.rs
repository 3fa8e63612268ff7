use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::job::{Job, JobId, SalaryRange};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// A job posted `id` hours after [`base_time`], so higher ids are newer.
pub fn job(id: JobId, title: &str, industry: &str, job_type: &str, salary_min: Option<i64>) -> Job {
    let posted = base_time() + Duration::hours(id);
    Job {
        id,
        title: title.to_string(),
        company: format!("Company {id}"),
        location: "Remote".to_string(),
        job_type: job_type.to_string(),
        salary: salary_min.map(|min| SalaryRange {
            min: Some(min),
            max: None,
        }),
        description: String::new(),
        requirements: vec![],
        benefits: vec![],
        posted,
        deadline: posted + Duration::days(30),
        industry: industry.to_string(),
        featured: false,
    }
}

/// The two jobs used throughout the worked examples.
pub fn example_jobs() -> Vec<Job> {
    vec![
        job(1, "Backend Engineer", "technology", "full time", Some(90_000)),
        job(2, "Sales Rep", "retail", "part time", Some(40_000)),
    ]
}
