use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::job::{Job, JobId};
use crate::routes::UserIdQuery;
use crate::saved_jobs::registry::SavedJobsRegistry;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavedJobsResponse {
    pub job_ids: Vec<JobId>,
    /// Saved jobs that still exist, in save order.
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct SavedState {
    pub job_id: JobId,
    pub saved: bool,
}

/// GET /api/v1/saved-jobs
pub async fn handle_list_saved(
    State(state): State<AppState>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<SavedJobsResponse>, AppError> {
    let Query(params) = params?;
    let registry = SavedJobsRegistry::for_user(state.kv.clone(), params.user_id);
    let job_ids = registry.list().await?;

    let mut jobs = Vec::with_capacity(job_ids.len());
    for &id in &job_ids {
        match state.jobs.get(id).await {
            Ok(job) => jobs.push(job),
            Err(AppError::NotFound(_)) => debug!("Saved job {id} no longer exists"),
            Err(e) => return Err(e),
        }
    }

    Ok(Json(SavedJobsResponse { job_ids, jobs }))
}

/// GET /api/v1/saved-jobs/:job_id
pub async fn handle_is_saved(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<SavedState>, AppError> {
    let Query(params) = params?;
    let registry = SavedJobsRegistry::for_user(state.kv.clone(), params.user_id);
    let saved = registry.is_saved(job_id).await?;
    Ok(Json(SavedState { job_id, saved }))
}

/// POST /api/v1/saved-jobs/:job_id/toggle
pub async fn handle_toggle_saved(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<SavedState>, AppError> {
    let Query(params) = params?;
    let registry = SavedJobsRegistry::for_user(state.kv.clone(), params.user_id);
    let saved = registry.toggle(job_id).await?;
    Ok(Json(SavedState { job_id, saved }))
}
