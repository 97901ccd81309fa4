use serde::Serialize;

use super::dto::{CreateProjectRequest, ListQuery, UpdateProjectRequest};
use super::repo_types::{NewProject, ProjectFilter, ProjectPatch, ProjectStatus, ProjectWithTasks};
use crate::error::{AppError, AppResult};

fn required_title(raw: &str) -> AppResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    Ok(title.to_string())
}

/// Apply defaults: empty description, IN_PROGRESS, MEDIUM, no deadline.
pub fn new_project(req: CreateProjectRequest) -> AppResult<NewProject> {
    let title = required_title(req.title.as_deref().unwrap_or_default())?;
    Ok(NewProject {
        title,
        description: req.description.unwrap_or_default(),
        status: req.status.unwrap_or_default(),
        priority: req.priority.unwrap_or_default(),
        deadline: req.deadline,
    })
}

pub fn project_patch(req: UpdateProjectRequest) -> AppResult<ProjectPatch> {
    let title = req.title.as_deref().map(required_title).transpose()?;
    Ok(ProjectPatch {
        title,
        description: req.description,
        status: req.status,
        priority: req.priority,
        deadline: req.deadline,
    })
}

pub fn list_filter(q: ListQuery) -> ProjectFilter {
    ProjectFilter {
        status: q.status,
        search: q.q.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
    }
}

/// Dashboard counters over one user's projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub in_progress: usize,
    pub paused: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub tasks_total: usize,
    pub tasks_completed: usize,
}

impl ProjectStats {
    pub fn from_projects(projects: &[ProjectWithTasks]) -> Self {
        let mut stats = ProjectStats {
            total: projects.len(),
            ..Default::default()
        };
        for p in projects {
            match p.project.status {
                ProjectStatus::InProgress => stats.in_progress += 1,
                ProjectStatus::Paused => stats.paused += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::Cancelled => stats.cancelled += 1,
            }
            stats.tasks_total += p.tasks.len();
            stats.tasks_completed += p.tasks.iter().filter(|t| t.completed).count();
        }
        stats
    }
}
