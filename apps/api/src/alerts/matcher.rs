//! Alert matching: re-evaluates an alert's stored criteria against the
//! current job collection and records the match count.
//!
//! Each check starts from scratch; nothing is carried between checks.
//! Scheduling periodic checks is left to whatever calls the check endpoint.

use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::listings::criteria::Criteria;
use crate::listings::filter::count_matching;
use crate::models::alert::{Alert, AlertCriteria, AlertId};
use crate::models::job::Job;
use crate::store::{AlertSource, JobSource};

/// Number of jobs the alert's criteria select.
pub fn count_alert_matches(jobs: &[Job], criteria: &AlertCriteria) -> usize {
    count_matching(jobs, &Criteria::from(criteria))
}

/// Recomputes `match_count` for one alert and stamps `last_checked`.
pub async fn check_alert(
    alerts: &dyn AlertSource,
    jobs: &dyn JobSource,
    id: AlertId,
) -> Result<Alert, AppError> {
    let alert = alerts.get(id).await?;
    let snapshot = jobs.list().await?;
    let count = count_alert_matches(&snapshot, &alert.criteria);

    info!(
        "Alert {} ('{}') matches {} of {} jobs",
        id,
        alert.name,
        count,
        snapshot.len()
    );

    let count = i64::try_from(count).unwrap_or(i64::MAX);
    alerts.record_check(id, count, Utc::now()).await
}
