use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::Deserialize;
use tokio::sync::broadcast;

use super::events::{BoardEvent, broadcast_event};
use super::state::{BoardHandle, MutationError};
use crate::board::form::ValidationErrors;
use crate::board::models::{JobFields, JobId, JobPatch, Stage};
use crate::board::stages::list_stages;
use crate::board::store;
use crate::board::{today, view};
use crate::errors::{BoardError, StorageError};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub board: BoardHandle,
    pub events_tx: broadcast::Sender<BoardEvent>,
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

/// Body of `POST /api/jobs`. Missing text fields are treated as empty so
/// that validation, not deserialization, reports them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateJobRequest {
    pub company_name: String,
    pub position_title: String,
    pub status: Option<String>,
    pub location: String,
    pub salary_range: String,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateJobRequest {
    pub company_name: Option<String>,
    pub position_title: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveJobRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub stage: Option<String>,
}

fn parse_stage(raw: Option<&str>) -> Result<Option<Stage>, ApiError> {
    raw.map(Stage::from_str).transpose().map_err(ApiError::from)
}

impl CreateJobRequest {
    fn into_fields(self) -> Result<JobFields, ApiError> {
        Ok(JobFields {
            status: parse_stage(self.status.as_deref())?.unwrap_or_default(),
            company_name: self.company_name,
            position_title: self.position_title,
            location: self.location,
            salary_range: self.salary_range,
            notes: self.notes,
        })
    }
}

impl UpdateJobRequest {
    fn into_patch(self) -> Result<JobPatch, ApiError> {
        Ok(JobPatch {
            status: parse_stage(self.status.as_deref())?,
            company_name: self.company_name,
            position_title: self.position_title,
            location: self.location,
            salary_range: self.salary_range,
            notes: self.notes,
        })
    }
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unprocessable(ValidationErrors),
    Internal(String),
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::JobNotFound { .. } => ApiError::NotFound(err.to_string()),
            BoardError::UnknownStage { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::Board(e) => e.into(),
            MutationError::Invalid(errors) => ApiError::Unprocessable(errors),
            MutationError::Storage(e) => e.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({"error": msg})),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({"error": msg}))
            }
            ApiError::Unprocessable(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({"error": errors.to_string(), "fields": errors.errors}),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": msg}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/stages", get(get_stages))
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route(
            "/api/jobs/{id}",
            get(get_job).patch(update_job).delete(delete_job),
        )
        .route("/api/jobs/{id}/move", patch(move_job))
        .route("/api/board", get(get_board))
        .route("/api/summary", get(get_summary))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn get_stages() -> impl IntoResponse {
    Json(list_stages())
}

async fn list_jobs(
    State(state): State<SharedState>,
    Query(query): Query<ListJobsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stage = parse_stage(query.stage.as_deref())?;
    let jobs = state.board.call(|b| b.jobs()).await??;
    let jobs = match stage {
        Some(stage) => store::partition_by_stage(&jobs, list_stages())
            .remove(&stage)
            .unwrap_or_default(),
        None => jobs,
    };
    Ok(Json(jobs))
}

async fn create_job(
    State(state): State<SharedState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = req.into_fields()?;
    let job = state.board.call(move |b| b.create(fields, today())).await??;
    broadcast_event(&state.events_tx, BoardEvent::JobCreated { job: job.clone() });
    Ok((StatusCode::CREATED, Json(job)))
}

async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = JobId::from(id);
    let lookup = id.clone();
    let job = state.board.call(move |b| b.get(&lookup)).await??;
    job.map(Json)
        .ok_or_else(|| ApiError::from(BoardError::JobNotFound { id }))
}

async fn update_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = req.into_patch()?;
    let id = JobId::from(id);
    let job = state.board.call(move |b| b.update(&id, &patch)).await??;
    broadcast_event(&state.events_tx, BoardEvent::JobUpdated { job: job.clone() });
    Ok(Json(job))
}

async fn move_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<MoveJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stage = Stage::from_str(&req.status)?;
    let id = JobId::from(id);
    let result = state.board.call(move |b| b.move_to(&id, stage)).await??;
    if result.moved {
        broadcast_event(
            &state.events_tx,
            BoardEvent::JobMoved {
                job_id: result.job.id.clone(),
                from_status: result.from,
                to_status: result.job.status,
            },
        );
    }
    Ok(Json(result.job))
}

async fn delete_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = JobId::from(id);
    let target = id.clone();
    let deleted = state.board.call(move |b| b.delete(&target)).await??;
    if deleted {
        broadcast_event(&state.events_tx, BoardEvent::JobDeleted { job_id: id });
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_board(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let jobs = state.board.call(|b| b.jobs()).await??;
    Ok(Json(view::board_view(&jobs)))
}

async fn get_summary(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let jobs = state.board.call(|b| b.jobs()).await??;
    Ok(Json(view::board_summary(&jobs)))
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ids::SequentialIds;
    use crate::board::seed::demo_jobs;
    use crate::server::state::BoardState;
    use crate::storage::JsonFileStore;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Demo board backed by a file in a fresh temp dir. Keep the dir alive
    /// for the duration of the test.
    fn test_state() -> (TempDir, SharedState) {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("jobs.json")).unwrap();
        store.save(demo_jobs()).unwrap();
        let ids = SequentialIds::after(store.jobs().iter().map(|j| &j.id));
        let board = BoardState::new(store, Box::new(ids));
        let (events_tx, _) = broadcast::channel(16);
        let state = Arc::new(AppState {
            board: BoardHandle::new(board),
            events_tx,
        });
        (dir, state)
    }

    fn test_app() -> (TempDir, Router) {
        let (dir, state) = test_state();
        (dir, api_router().with_state(state))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, app) = test_app();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_stages_in_column_order() {
        let (_dir, app) = test_app();
        let response = app.oneshot(get("/api/stages")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stages: Vec<serde_json::Value> = body_json(response.into_body()).await;
        let ids: Vec<&str> = stages.iter().map(|s| s["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["applied", "screening", "interview", "offer", "rejected"]);
        assert_eq!(stages[0]["displayTitle"], "Applied");
    }

    #[tokio::test]
    async fn test_list_jobs_filtered_by_stage() {
        let (_dir, app) = test_app();
        let response = app.oneshot(get("/api/jobs?stage=applied")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let jobs: Vec<serde_json::Value> = body_json(response.into_body()).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["companyName"], "StartupXYZ");
    }

    #[tokio::test]
    async fn test_list_jobs_unknown_stage_is_bad_request() {
        let (_dir, app) = test_app();
        let response = app.oneshot(get("/api/jobs?stage=hired")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("hired"));
    }

    #[tokio::test]
    async fn test_create_job_defaults_and_broadcasts() {
        let (_dir, state) = test_state();
        let mut rx = state.events_tx.subscribe();
        let app = api_router().with_state(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/jobs",
                serde_json::json!({"companyName": "Acme", "positionTitle": "Engineer"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let job: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(job["id"], "5");
        assert_eq!(job["status"], "applied");
        assert_eq!(job["location"], "");

        let event = serde_json::to_value(rx.recv().await.unwrap()).unwrap();
        assert_eq!(event["type"], "JobCreated");
        assert_eq!(event["data"]["job"]["companyName"], "Acme");
    }

    #[tokio::test]
    async fn test_create_job_missing_required_fields() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/jobs",
                serde_json::json!({"companyName": "  "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = body_json(response.into_body()).await;
        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["companyName", "positionTitle"]);
    }

    #[tokio::test]
    async fn test_create_job_unknown_stage() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/jobs",
                serde_json::json!({"companyName": "A", "positionTitle": "B", "status": "hired"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_job_and_not_found() {
        let (_dir, app) = test_app();
        let response = app.clone().oneshot(get("/api/jobs/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let job: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(job["companyName"], "TechCorp Inc.");

        let response = app.oneshot(get("/api/jobs/99")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_job_merges_fields() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(json_request(
                "PATCH",
                "/api/jobs/2",
                serde_json::json!({"notes": "Recruiter called"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let job: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(job["notes"], "Recruiter called");
        assert_eq!(job["companyName"], "StartupXYZ");
        assert_eq!(job["applicationDate"], "2024-01-10");
    }

    #[tokio::test]
    async fn test_update_missing_job_is_not_found() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(json_request(
                "PATCH",
                "/api/jobs/99",
                serde_json::json!({"notes": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_move_job_broadcasts_transition() {
        let (_dir, state) = test_state();
        let mut rx = state.events_tx.subscribe();
        let app = api_router().with_state(state);

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/api/jobs/2/move",
                serde_json::json!({"status": "screening"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let job: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(job["status"], "screening");

        let event = serde_json::to_value(rx.recv().await.unwrap()).unwrap();
        assert_eq!(event["type"], "JobMoved");
        assert_eq!(event["data"]["fromStatus"], "applied");
        assert_eq!(event["data"]["toStatus"], "screening");
    }

    #[tokio::test]
    async fn test_move_to_same_stage_is_silent() {
        let (_dir, state) = test_state();
        let mut rx = state.events_tx.subscribe();
        let app = api_router().with_state(state);

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/api/jobs/1/move",
                serde_json::json!({"status": "interview"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_job_is_idempotent() {
        let (_dir, state) = test_state();
        let app = api_router().with_state(state.clone());

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/jobs/3")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/jobs/3")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let remaining = state.board.call(|b| b.jobs()).await.unwrap().unwrap();
        assert_eq!(remaining.len(), 3);
    }

    #[tokio::test]
    async fn test_board_and_summary() {
        let (_dir, app) = test_app();
        let response = app.clone().oneshot(get("/api/board")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let board: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(board["total"], 4);
        assert_eq!(board["columns"].as_array().unwrap().len(), 5);
        assert_eq!(board["columns"][1]["title"], "Screening");
        assert_eq!(board["columns"][1]["count"], 1);
        assert_eq!(board["columns"][4]["count"], 0);

        let response = app.oneshot(get("/api/summary")).await.unwrap();
        let summary: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(summary["total"], 4);
        assert_eq!(summary["byStage"][0]["stage"], "applied");
        assert_eq!(summary["byStage"][0]["count"], 1);
    }
}
