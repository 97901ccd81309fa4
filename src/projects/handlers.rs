use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        CreateProjectRequest, ListQuery, MessageResponse, ProjectResponse, ProjectsResponse,
        StatsResponse, UpdateProjectRequest,
    },
    repo_types::ProjectFilter,
    services::{list_filter, new_project, project_patch, ProjectStats},
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppJson, AppResult},
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/stats", get(project_stats))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// Malformed ids are reported like unknown ones.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

#[instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<ProjectsResponse>> {
    let projects = state.projects.list(user_id, &list_filter(q)).await?;
    Ok(Json(ProjectsResponse { projects }))
}

#[instrument(skip(state, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let new = new_project(payload)?;
    let project = state.projects.create(user_id, new).await?;
    info!(%user_id, project_id = %project.project.id, "project created");
    Ok(Json(ProjectResponse {
        message: Some("Project created successfully"),
        project,
    }))
}

#[instrument(skip(state))]
pub async fn project_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<StatsResponse>> {
    let projects = state.projects.list(user_id, &ProjectFilter::default()).await?;
    Ok(Json(StatsResponse {
        stats: ProjectStats::from_projects(&projects),
    }))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectResponse>> {
    let id = parse_id(&id, "Project not found")?;
    let project = state
        .projects
        .get(user_id, id)
        .await?
        .ok_or_else(project_not_found)?;
    Ok(Json(ProjectResponse {
        message: None,
        project,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let id = parse_id(&id, "Project not found")?;
    let patch = project_patch(payload)?;
    match state.projects.update(user_id, id, patch).await? {
        Some(project) => {
            info!(%user_id, project_id = %id, "project updated");
            Ok(Json(ProjectResponse {
                message: None,
                project,
            }))
        }
        None => {
            warn!(%user_id, project_id = %id, "update of missing or foreign project");
            Err(project_not_found())
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, "Project not found")?;
    if !state.projects.delete(user_id, id).await? {
        warn!(%user_id, project_id = %id, "delete of missing or foreign project");
        return Err(project_not_found());
    }
    info!(%user_id, project_id = %id, "project deleted");
    Ok(Json(MessageResponse {
        message: "Project deleted successfully",
    }))
}
