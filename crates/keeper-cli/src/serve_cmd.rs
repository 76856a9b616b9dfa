//! The keeper REST API server.
//!
//! Thin glue over the service layer: axum routing, request/response DTOs,
//! the identity extractor, and status-code mapping. No business rules live
//! here.

use std::net::SocketAddr;

use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use keeper_core::error::ServiceError;
use keeper_core::lists::{self as list_service, ListPatch};
use keeper_core::tasks::{self as task_service, TaskPatch};
use keeper_core::validate::{self, ValidationError};
use keeper_db::models::{Task, TodoList};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => Self {
                status: StatusCode::NOT_FOUND,
                message,
            },
            ServiceError::Conflict(message) => Self {
                status: StatusCode::CONFLICT,
                message,
            },
            ServiceError::Database(e) => {
                tracing::error!(error = %e, "unhandled database failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal server error".to_string(),
                }
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Identity extractor
// ---------------------------------------------------------------------------

/// Header carrying the authenticated principal name, set by the fronting
/// identity-aware proxy after it has authenticated the user.
pub const OWNER_HEADER: &str = "x-forwarded-user";

/// The authenticated owner for a request.
///
/// The value is treated as an opaque string; nothing here parses tokens or
/// claims. Requests without an established identity are rejected with 401.
pub struct Owner(pub String);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(OWNER_HEADER)
            .ok_or_else(|| AppError::unauthorized("missing identity header"))?;

        let owner = value
            .to_str()
            .map_err(|_| AppError::unauthorized("invalid identity header"))?
            .trim();

        if owner.is_empty() {
            return Err(AppError::unauthorized("missing identity header"));
        }

        Ok(Owner(owner.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
    pub list_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: Option<bool>,
    pub list_id: Option<Uuid>,
}

/// Wire representation of a list. The owner id is never exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<TodoList> for ListResponse {
    fn from(list: TodoList) -> Self {
        Self {
            id: list.id,
            name: list.name,
            description: list.description,
        }
    }
}

/// Wire representation of a task.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub list_id: Uuid,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
            due_date: task.due_date,
            completed: task.completed,
            list_id: task.list_id,
        }
    }
}

/// Task as rendered inside `GET /lists/{id}/tasks`, where the list id is
/// already part of the path and is omitted from each body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInListResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
}

impl From<Task> for TaskInListResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
            due_date: task.due_date,
            completed: task.completed,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/lists", get(list_lists).post(create_list))
        .route(
            "/lists/{id}",
            get(get_list).patch(update_list).delete(delete_list),
        )
        .route("/lists/{id}/tasks", get(list_tasks_in_list))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pool: PgPool, bind: &str, port: u16) -> Result<()> {
    let app = build_router(pool);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("keeper serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("keeper serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers: index
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html>\
<html><head><title>keeper</title></head><body>\
<h1>keeper</h1>\
<p>Owner-scoped task-list API. All endpoints require the identity header \
set by the fronting proxy.</p>\
<ul>\
<li>GET/POST /lists</li>\
<li>GET/PATCH/DELETE /lists/{id}</li>\
<li>GET /lists/{id}/tasks</li>\
<li>GET/POST /tasks</li>\
<li>GET/PATCH/DELETE /tasks/{id}</li>\
</ul>\
</body></html>",
    )
}

// ---------------------------------------------------------------------------
// Handlers: lists
// ---------------------------------------------------------------------------

async fn list_lists(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
) -> Result<Response, AppError> {
    let lists = list_service::get_all(&pool, &owner).await?;
    let body: Vec<ListResponse> = lists.into_iter().map(ListResponse::from).collect();
    Ok(Json(body).into_response())
}

async fn get_list(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let list = list_service::get_by_id(&pool, id, &owner).await?;
    Ok(Json(ListResponse::from(list)).into_response())
}

async fn create_list(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Json(req): Json<CreateListRequest>,
) -> Result<Response, AppError> {
    validate::validate_name(&req.name)?;
    if let Some(desc) = req.description.as_deref() {
        validate::validate_description(desc)?;
    }

    let list = list_service::create(&pool, &req.name, req.description.as_deref(), &owner).await?;

    let location = format!("/lists/{}", list.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ListResponse::from(list)),
    )
        .into_response())
}

async fn update_list(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateListRequest>,
) -> Result<Response, AppError> {
    if let Some(name) = req.name.as_deref() {
        validate::validate_name(name)?;
    }
    if let Some(desc) = req.description.as_deref() {
        validate::validate_description(desc)?;
    }

    let patch = ListPatch {
        name: req.name,
        description: req.description,
    };
    let list = list_service::update(&pool, id, &patch, &owner).await?;
    Ok(Json(ListResponse::from(list)).into_response())
}

async fn delete_list(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    list_service::delete(&pool, id, &owner).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_tasks_in_list(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let tasks = task_service::get_by_list_id(&pool, id, &owner).await?;
    let body: Vec<TaskInListResponse> = tasks.into_iter().map(TaskInListResponse::from).collect();
    Ok(Json(body).into_response())
}

// ---------------------------------------------------------------------------
// Handlers: tasks
// ---------------------------------------------------------------------------

async fn list_tasks(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
) -> Result<Response, AppError> {
    let tasks = task_service::get_all(&pool, &owner).await?;
    let body: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(Json(body).into_response())
}

async fn get_task(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let task = task_service::get_by_id(&pool, id, &owner).await?;
    Ok(Json(TaskResponse::from(task)).into_response())
}

async fn create_task(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Response, AppError> {
    validate::validate_name(&req.name)?;
    if let Some(desc) = req.description.as_deref() {
        validate::validate_description(desc)?;
    }

    let task = task_service::create(
        &pool,
        &req.name,
        req.description.as_deref(),
        req.due_date,
        req.completed,
        req.list_id,
        &owner,
    )
    .await?;

    let location = format!("/tasks/{}", task.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TaskResponse::from(task)),
    )
        .into_response())
}

async fn update_task(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Response, AppError> {
    if let Some(name) = req.name.as_deref() {
        validate::validate_name(name)?;
    }
    if let Some(desc) = req.description.as_deref() {
        validate::validate_description(desc)?;
    }

    let patch = TaskPatch {
        name: req.name,
        description: req.description,
        due_date: req.due_date,
        completed: req.completed,
        list_id: req.list_id,
    };
    let task = task_service::update(&pool, id, &patch, &owner).await?;
    Ok(Json(TaskResponse::from(task)).into_response())
}

async fn delete_task(
    State(pool): State<PgPool>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    task_service::delete(&pool, id, &owner).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
