use super::dto::UpdateTaskRequest;
use super::repo_types::TaskPatch;
use crate::error::{AppError, AppResult};

/// Trimmed task text; blank text is rejected.
pub fn task_text(raw: Option<&str>) -> AppResult<String> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::Validation("Task text is required".into()));
    }
    Ok(text.to_string())
}

pub fn task_patch(req: UpdateTaskRequest) -> AppResult<TaskPatch> {
    let text = match req.text {
        Some(raw) => Some(task_text(Some(&raw))?),
        None => None,
    };
    Ok(TaskPatch {
        text,
        completed: req.completed,
    })
}
