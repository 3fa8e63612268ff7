pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::alerts::handlers as alerts;
use crate::applications::handlers as applications;
use crate::listings::handlers as listings;
use crate::resumes::handlers as resumes;
use crate::saved_jobs::handlers as saved_jobs;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Listings
        .route(
            "/api/v1/jobs",
            get(listings::handle_list_jobs).post(listings::handle_create_job),
        )
        .route("/api/v1/jobs/featured", get(listings::handle_featured_jobs))
        .route(
            "/api/v1/jobs/:id",
            get(listings::handle_get_job).delete(listings::handle_delete_job),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications).post(applications::handle_apply),
        )
        .route(
            "/api/v1/applications/summary",
            get(applications::handle_application_summary),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route("/api/v1/resumes/:id/default", put(resumes::handle_set_default))
        .route("/api/v1/resumes/:id/profile", get(resumes::handle_get_profile))
        .route("/api/v1/resumes/:id/download", get(resumes::handle_download))
        // Alerts
        .route(
            "/api/v1/alerts",
            get(alerts::handle_list_alerts).post(alerts::handle_create_alert),
        )
        .route("/api/v1/alerts/draft", get(alerts::handle_alert_draft))
        .route(
            "/api/v1/alerts/:id",
            axum::routing::patch(alerts::handle_update_alert).delete(alerts::handle_delete_alert),
        )
        .route("/api/v1/alerts/:id/toggle", post(alerts::handle_toggle_alert))
        .route("/api/v1/alerts/:id/check", post(alerts::handle_check_alert))
        // Saved jobs
        .route("/api/v1/saved-jobs", get(saved_jobs::handle_list_saved))
        .route("/api/v1/saved-jobs/:job_id", get(saved_jobs::handle_is_saved))
        .route(
            "/api/v1/saved-jobs/:job_id/toggle",
            post(saved_jobs::handle_toggle_saved),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::in_memory(Config::in_memory()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn job_body(title: &str, industry: &str, job_type: &str, salary_min: i64, posted: &str) -> Value {
        json!({
            "title": title,
            "company": "Acme",
            "location": "Remote",
            "job_type": job_type,
            "salary": { "min": salary_min, "max": null },
            "description": "",
            "posted": posted,
            "deadline": "2030-01-01T00:00:00Z",
            "industry": industry,
            "featured": industry == "technology"
        })
    }

    async fn seed_example_jobs(app: &Router) {
        let backend = job_body("Backend Engineer", "technology", "full-time", 90_000, "2024-03-01T10:00:00Z");
        let sales = job_body("Sales Rep", "retail", "part time", 40_000, "2024-03-01T11:00:00Z");
        for body in [backend, sales] {
            let (status, _) = send(app, Method::POST, "/api/v1/jobs", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_listing_filters_and_paginates() {
        let app = app();
        seed_example_jobs(&app).await;

        let (status, body) = send(&app, Method::GET, "/api/v1/jobs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_items"], 2);
        assert_eq!(body["total_pages"], 1);
        assert_eq!(body["page_size"], 8);
        assert_eq!(body["items"][0]["title"], "Sales Rep");

        let (_, body) = send(&app, Method::GET, "/api/v1/jobs?industry=technology", None).await;
        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["title"], "Backend Engineer");
        assert_eq!(body["items"][0]["job_type"], "full time");

        let (_, body) = send(&app, Method::GET, "/api/v1/jobs?salary=50000-100000&search=", None).await;
        assert_eq!(body["total_items"], 1);

        let (status, body) = send(&app, Method::GET, "/api/v1/jobs?page=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["total_items"], 2);
    }

    #[tokio::test]
    async fn test_featured_and_detail() {
        let app = app();
        seed_example_jobs(&app).await;

        let (_, body) = send(&app, Method::GET, "/api/v1/jobs/featured", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let id = body[0]["id"].as_i64().unwrap();

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/jobs/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Backend Engineer");

        let (status, body) = send(&app, Method::GET, "/api/v1/jobs/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["retryable"], false);
    }

    #[tokio::test]
    async fn test_create_job_requires_title() {
        let mut body = job_body("", "technology", "contract", 1, "2024-03-01T10:00:00Z");
        body["title"] = json!(" ");
        let (status, body) = send(&app(), Method::POST, "/api/v1/jobs", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_alert_lifecycle() {
        let app = app();
        seed_example_jobs(&app).await;

        let (status, _) = send(&app, Method::POST, "/api/v1/alerts", Some(json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, alert) = send(
            &app,
            Method::POST,
            "/api/v1/alerts",
            Some(json!({ "name": "Full time roles", "job_type": "full-time", "frequency": "weekly" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(alert["is_active"], true);
        assert_eq!(alert["match_count"], 0);
        let id = alert["id"].as_i64().unwrap();

        let (_, checked) = send(&app, Method::POST, &format!("/api/v1/alerts/{id}/check"), None).await;
        assert_eq!(checked["match_count"], 1);

        let (_, toggled) = send(&app, Method::POST, &format!("/api/v1/alerts/{id}/toggle"), None).await;
        assert_eq!(toggled["is_active"], false);

        let (_, updated) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/alerts/{id}"),
            Some(json!({ "job_type": "" })),
        )
        .await;
        assert_eq!(updated["criteria"]["job_type"], Value::Null);
        assert_eq!(updated["name"], "Full time roles");

        let (_, checked) = send(&app, Method::POST, &format!("/api/v1/alerts/{id}/check"), None).await;
        assert_eq!(checked["match_count"], 2);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/alerts/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/alerts/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_alert_draft_from_listing_filters() {
        let (status, body) = send(
            &app(),
            Method::GET,
            "/api/v1/alerts/draft?search=Rust&location=new-york&industry=finance&salary=",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Rust new york finance");
        assert_eq!(body["criteria"]["title"], "Rust");
        assert_eq!(body["criteria"]["salary"], Value::Null);
        assert_eq!(body["frequency"], "daily");
    }

    #[tokio::test]
    async fn test_saved_jobs_toggle() {
        let app = app();
        seed_example_jobs(&app).await;
        let user = Uuid::new_v4();

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/saved-jobs/1?user_id={user}"), None).await;
        assert_eq!(body["saved"], false);

        let (_, body) = send(&app, Method::POST, &format!("/api/v1/saved-jobs/1/toggle?user_id={user}"), None).await;
        assert_eq!(body["saved"], true);
        send(&app, Method::POST, &format!("/api/v1/saved-jobs/77/toggle?user_id={user}"), None).await;

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/saved-jobs?user_id={user}"), None).await;
        assert_eq!(body["job_ids"], json!([1, 77]));
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::POST, &format!("/api/v1/saved-jobs/1/toggle?user_id={user}"), None).await;
        assert_eq!(body["saved"], false);
    }

    #[tokio::test]
    async fn test_apply_with_default_resume() {
        let app = app();
        seed_example_jobs(&app).await;
        let user = Uuid::new_v4();

        let (status, resume) = send(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "user_id": user, "filename": "cv", "file_ref": "resumes/cv.pdf" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resume["is_default"], true);

        let (status, application) = send(
            &app,
            Method::POST,
            "/api/v1/applications",
            Some(json!({ "job_id": 1, "user_id": user, "cover_letter": "Hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(application["status"], "submitted");
        assert_eq!(application["resume_id"], resume["id"]);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/applications",
            Some(json!({ "job_id": 1, "user_id": user })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send(&app, Method::GET, &format!("/api/v1/applications?user_id={user}"), None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        send(
            &app,
            Method::POST,
            "/api/v1/applications",
            Some(json!({ "job_id": 2, "user_id": user })),
        )
        .await;
        let (status, summary) = send(
            &app,
            Method::GET,
            &format!("/api/v1/applications/summary?user_id={user}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["submitted"], 2);
        assert_eq!(summary["interview"], 0);
    }

    #[tokio::test]
    async fn test_delete_resume_promotes_next_default() {
        let app = app();
        let user = Uuid::new_v4();
        let mut ids = Vec::new();
        for filename in ["a.pdf", "b.pdf"] {
            let (_, resume) = send(
                &app,
                Method::POST,
                "/api/v1/resumes",
                Some(json!({ "user_id": user, "filename": filename, "file_ref": filename })),
            )
            .await;
            ids.push(resume["id"].as_i64().unwrap());
        }

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/resumes/{}", ids[0]), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = send(&app, Method::GET, &format!("/api/v1/resumes?user_id={user}"), None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], ids[1]);
        assert_eq!(list[0]["is_default"], true);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/resumes/{}", ids[0]), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_requests_use_error_envelope() {
        let app = app();
        for uri in [
            "/api/v1/jobs?page=abc",
            "/api/v1/saved-jobs",
            "/api/v1/applications?user_id=not-a-uuid",
            "/api/v1/resumes",
        ] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
            assert_eq!(body["error"]["retryable"], false, "{uri}");
        }

        let (status, body) = send(&app, Method::POST, "/api/v1/alerts", Some(json!({ "frequency": "daily" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_resume_default_and_profile() {
        let app = app();
        let user = Uuid::new_v4();
        let mut ids = Vec::new();
        for filename in ["a.pdf", "b.pdf"] {
            let (_, resume) = send(
                &app,
                Method::POST,
                "/api/v1/resumes",
                Some(json!({ "user_id": user, "filename": filename, "file_ref": filename })),
            )
            .await;
            ids.push(resume["id"].as_i64().unwrap());
        }

        let (status, resume) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/resumes/{}/default", ids[1]),
            Some(json!({ "user_id": user })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resume["is_default"], true);

        let (_, list) = send(&app, Method::GET, &format!("/api/v1/resumes?user_id={user}"), None).await;
        let defaults: Vec<&Value> = list
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["is_default"] == true)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0]["id"], ids[1]);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/resumes/{}/profile", ids[0]), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/resumes/{}/download", ids[0]), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
