use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::applications::service::submit_application;
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationId, ApplicationSummary, ApplyRequest,
};
use crate::routes::UserIdQuery;
use crate::state::AppState;

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<Vec<Application>>, AppError> {
    let Query(params) = params?;
    Ok(Json(state.applications.list(params.user_id).await?))
}

/// GET /api/v1/applications/summary
pub async fn handle_application_summary(
    State(state): State<AppState>,
    params: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<ApplicationSummary>, AppError> {
    let Query(params) = params?;
    let applications = state.applications.list(params.user_id).await?;
    Ok(Json(ApplicationSummary::from_applications(&applications)))
}

/// POST /api/v1/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    request: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let Json(request) = request?;
    let application = submit_application(
        state.jobs.as_ref(),
        state.resumes.as_ref(),
        state.applications.as_ref(),
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<Application>, AppError> {
    Ok(Json(state.applications.get(id).await?))
}
