//! Axum route handlers for resumes. Files are uploaded elsewhere; these
//! routes manage metadata and serve downloads.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, Resume, ResumeId, ResumeProfile};
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetDefaultRequest {
    pub user_id: Uuid,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Vec<Resume>>, AppError> {
    let Query(params) = params?;
    Ok(Json(state.resumes.list(params.user_id).await?))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    request: Result<Json<NewResume>, JsonRejection>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let Json(request) = request?;
    request.validate().map_err(AppError::Validation)?;
    let resume = state.resumes.create(request).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<ResumeId>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.get(id).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<ResumeId>,
) -> Result<StatusCode, AppError> {
    if state.resumes.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {id} not found")))
    }
}

/// PUT /api/v1/resumes/:id/default
pub async fn handle_set_default(
    State(state): State<AppState>,
    Path(id): Path<ResumeId>,
    request: Result<Json<SetDefaultRequest>, JsonRejection>,
) -> Result<Json<Resume>, AppError> {
    let Json(request) = request?;
    Ok(Json(state.resumes.set_default(id, request.user_id).await?))
}

/// GET /api/v1/resumes/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<ResumeId>,
) -> Result<Json<ResumeProfile>, AppError> {
    Ok(Json(state.resumes.get_profile(id).await?))
}

/// GET /api/v1/resumes/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<ResumeId>,
) -> Result<impl IntoResponse, AppError> {
    let file = state.resumes.download(id).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.filename.replace('"', "")
    );
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
