use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::{deadline, Priority, ProjectStatus, ProjectWithTasks};
use super::services::ProjectStats;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deadline::deserialize")]
    pub deadline: Option<Date>,
}

/// Only the fields present in the body change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deadline::deserialize_patch")]
    pub deadline: Option<Option<Date>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<ProjectStatus>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectWithTasks>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub project: ProjectWithTasks,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: ProjectStats,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
