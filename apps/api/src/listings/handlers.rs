//! Axum route handlers for job listings.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::listings::criteria::Criteria;
use crate::listings::pagination::Page;
use crate::models::job::{Job, JobId, NewJob};
use crate::state::AppState;

/// Listing filters plus the requested page, as they arrive in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub page: Option<usize>,
}

impl ListingQuery {
    pub fn criteria(&self) -> Criteria {
        Criteria {
            search: self.search.clone(),
            location: self.location.clone(),
            industry: self.industry.clone(),
            job_type: self.job_type.clone(),
            salary: self.salary.clone(),
        }
    }
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<Page<Job>>, AppError> {
    let Query(query) = query?;
    let criteria = query.criteria();
    let matched = state.jobs.list_matching(&criteria).await?;
    let page = state.paginator.page(&matched, query.page.unwrap_or(1));
    Ok(Json(page))
}

/// GET /api/v1/jobs/featured
pub async fn handle_featured_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = state.jobs.featured(state.config.featured_jobs_limit).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(state.jobs.get(id).await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    request: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let Json(request) = request?;
    request.validate().map_err(AppError::Validation)?;
    let job = state.jobs.create(request).await?;
    info!("Job {} posted: {}", job.id, job.title);
    Ok((StatusCode::CREATED, Json(job)))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<StatusCode, AppError> {
    if state.jobs.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Job {id} not found")))
    }
}
