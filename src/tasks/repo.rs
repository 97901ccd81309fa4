use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tasks::repo_types::{Task, TaskPatch};

/// Owner-scoped task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// `None` when the project does not exist or belongs to someone else.
    async fn create(&self, owner: Uuid, project_id: Uuid, text: String) -> anyhow::Result<Option<Task>>;
    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> anyhow::Result<Option<Task>>;
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, owner: Uuid, project_id: Uuid, text: String) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, user_id, text)
            SELECT p.id, p.user_id, $3
              FROM projects p
             WHERE p.id = $1 AND p.user_id = $2
            RETURNING id, project_id, user_id, text, completed, created_at
            "#,
        )
        .bind(project_id)
        .bind(owner)
        .bind(text)
        .fetch_optional(&self.db)
        .await
        .context("insert task")?;
        Ok(task)
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
               SET text      = COALESCE($3, text),
                   completed = COALESCE($4, completed)
             WHERE id = $1 AND user_id = $2
            RETURNING id, project_id, user_id, text, completed, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(patch.text)
        .bind(patch.completed)
        .fetch_optional(&self.db)
        .await
        .context("update task")?;
        Ok(task)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete task")?;
        Ok(res.rows_affected() > 0)
    }
}
