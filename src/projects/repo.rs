use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::projects::repo_types::{NewProject, Project, ProjectFilter, ProjectPatch, ProjectWithTasks};
use crate::tasks::repo_types::Task;

/// Owner-scoped project persistence. Every call filters on `owner`; a project
/// belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Newest first, each with its tasks.
    async fn list(&self, owner: Uuid, filter: &ProjectFilter) -> anyhow::Result<Vec<ProjectWithTasks>>;
    async fn create(&self, owner: Uuid, new: NewProject) -> anyhow::Result<ProjectWithTasks>;
    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<ProjectWithTasks>>;
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ProjectPatch,
    ) -> anyhow::Result<Option<ProjectWithTasks>>;
    /// Removes the project and its tasks. `false` when nothing matched.
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

/// Group tasks under their projects, keeping the order of both inputs.
pub fn attach_tasks(projects: Vec<Project>, tasks: Vec<Task>) -> Vec<ProjectWithTasks> {
    let mut by_project: HashMap<Uuid, Vec<Task>> = HashMap::new();
    for t in tasks {
        by_project.entry(t.project_id).or_default().push(t);
    }
    projects
        .into_iter()
        .map(|project| {
            let tasks = by_project.remove(&project.id).unwrap_or_default();
            ProjectWithTasks { project, tasks }
        })
        .collect()
}

/// Escape LIKE metacharacters and wrap the term for a substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[derive(Clone)]
pub struct PgProjectStore {
    db: PgPool,
}

impl PgProjectStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn tasks_for(&self, owner: Uuid, project_ids: &[Uuid]) -> anyhow::Result<Vec<Task>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, user_id, text, completed, created_at
            FROM tasks
            WHERE user_id = $1 AND project_id = ANY($2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .bind(project_ids)
        .fetch_all(&self.db)
        .await
        .context("list tasks for projects")?;
        Ok(rows)
    }

    async fn with_tasks(&self, owner: Uuid, project: Project) -> anyhow::Result<ProjectWithTasks> {
        let tasks = self.tasks_for(owner, &[project.id]).await?;
        Ok(ProjectWithTasks { project, tasks })
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self, owner: Uuid, filter: &ProjectFilter) -> anyhow::Result<Vec<ProjectWithTasks>> {
        let search = filter.search.as_deref().map(like_pattern);
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, title, description, status, priority, deadline, created_at
            FROM projects
            WHERE user_id = $1
              AND ($2::project_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .bind(filter.status)
        .bind(search)
        .fetch_all(&self.db)
        .await
        .context("list projects")?;

        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let tasks = self.tasks_for(owner, &ids).await?;
        Ok(attach_tasks(projects, tasks))
    }

    async fn create(&self, owner: Uuid, new: NewProject) -> anyhow::Result<ProjectWithTasks> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, title, description, status, priority, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, status, priority, deadline, created_at
            "#,
        )
        .bind(owner)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.status)
        .bind(new.priority)
        .bind(new.deadline)
        .fetch_one(&self.db)
        .await
        .context("insert project")?;
        Ok(ProjectWithTasks {
            project,
            tasks: Vec::new(),
        })
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<ProjectWithTasks>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, title, description, status, priority, deadline, created_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("get project")?;

        match project {
            Some(p) => Ok(Some(self.with_tasks(owner, p).await?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ProjectPatch,
    ) -> anyhow::Result<Option<ProjectWithTasks>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
               SET title       = COALESCE($3, title),
                   description = COALESCE($4, description),
                   status      = COALESCE($5, status),
                   priority    = COALESCE($6, priority),
                   deadline    = CASE WHEN $7 THEN $8 ELSE deadline END
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, priority, deadline, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.status)
        .bind(patch.priority)
        .bind(patch.deadline.is_some())
        .bind(patch.deadline.flatten())
        .fetch_optional(&self.db)
        .await
        .context("update project")?;

        match project {
            Some(p) => Ok(Some(self.with_tasks(owner, p).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        // tasks go with it through ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete project")?;
        Ok(res.rows_affected() > 0)
    }
}
