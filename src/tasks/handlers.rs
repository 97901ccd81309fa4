use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateTaskRequest, MessageResponse, TaskResponse, UpdateTaskRequest},
    services::{task_patch, task_text},
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppJson, AppResult},
    projects::handlers::parse_id,
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/projects/:id/tasks", post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(project_id): Path<String>,
    AppJson(payload): AppJson<CreateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let project_id = parse_id(&project_id, "Project not found")?;
    let text = task_text(payload.text.as_deref())?;
    let Some(task) = state.tasks.create(user_id, project_id, text).await? else {
        warn!(%user_id, %project_id, "task for missing or foreign project");
        return Err(AppError::NotFound("Project not found".into()));
    };
    info!(%user_id, %project_id, task_id = %task.id, "task created");
    Ok(Json(TaskResponse {
        message: "Task added successfully",
        task,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let id = parse_id(&id, "Task not found")?;
    let patch = task_patch(payload)?;
    let task = state
        .tasks
        .update(user_id, id, patch)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(Json(TaskResponse {
        message: "Task updated successfully",
        task,
    }))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, "Task not found")?;
    if !state.tasks.delete(user_id, id).await? {
        return Err(task_not_found());
    }
    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}
