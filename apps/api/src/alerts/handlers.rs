//! Axum route handlers for job alerts.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::alerts::matcher::check_alert;
use crate::errors::AppError;
use crate::listings::handlers::ListingQuery;
use crate::models::alert::{Alert, AlertCriteria, AlertFrequency, AlertId, AlertPatch, NewAlert};
use crate::state::AppState;

/// An unsaved alert prefilled from listing filters.
#[derive(Debug, Serialize)]
pub struct AlertDraft {
    pub name: String,
    pub criteria: AlertCriteria,
    pub frequency: AlertFrequency,
}

/// GET /api/v1/alerts
pub async fn handle_list_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Alert>>, AppError> {
    Ok(Json(state.alerts.list().await?))
}

/// POST /api/v1/alerts
pub async fn handle_create_alert(
    State(state): State<AppState>,
    request: Result<Json<NewAlert>, JsonRejection>,
) -> Result<(StatusCode, Json<Alert>), AppError> {
    let Json(request) = request?;
    request.validate().map_err(AppError::Validation)?;
    let alert = state.alerts.create(request).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// GET /api/v1/alerts/draft
///
/// Turns the current listing filters into a suggested alert.
pub async fn handle_alert_draft(
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<AlertDraft>, AppError> {
    let Query(query) = query?;
    let criteria = query.criteria();
    Ok(Json(AlertDraft {
        name: criteria.suggested_alert_name(),
        criteria: criteria.to_alert_criteria(),
        frequency: AlertFrequency::default(),
    }))
}

/// PATCH /api/v1/alerts/:id
pub async fn handle_update_alert(
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
    patch: Result<Json<AlertPatch>, JsonRejection>,
) -> Result<Json<Alert>, AppError> {
    let Json(patch) = patch?;
    patch.validate().map_err(AppError::Validation)?;
    Ok(Json(state.alerts.update(id, patch).await?))
}

/// POST /api/v1/alerts/:id/toggle
pub async fn handle_toggle_alert(
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
) -> Result<Json<Alert>, AppError> {
    Ok(Json(state.alerts.toggle_active(id).await?))
}

/// POST /api/v1/alerts/:id/check
pub async fn handle_check_alert(
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
) -> Result<Json<Alert>, AppError> {
    let alert = check_alert(state.alerts.as_ref(), state.jobs.as_ref(), id).await?;
    Ok(Json(alert))
}

/// DELETE /api/v1/alerts/:id
pub async fn handle_delete_alert(
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
) -> Result<StatusCode, AppError> {
    if state.alerts.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Alert {id} not found")))
    }
}
