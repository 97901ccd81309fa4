//! In-memory stores standing in for PostgreSQL in tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{
    repo::UserStore,
    repo_types::{CreateUserOutcome, User},
};
use crate::projects::{
    repo::{attach_tasks, ProjectStore},
    repo_types::{NewProject, Project, ProjectFilter, ProjectPatch, ProjectWithTasks},
};
use crate::tasks::{
    repo::TaskStore,
    repo_types::{Task, TaskPatch},
};

#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<Vec<User>>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().map_err(|_| anyhow::anyhow!("poisoned"))?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().map_err(|_| anyhow::anyhow!("poisoned"))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<CreateUserOutcome> {
        let mut users = self.users.lock().map_err(|_| anyhow::anyhow!("poisoned"))?;
        if users.iter().any(|u| u.email == email) {
            return Ok(CreateUserOutcome::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            avatar: None,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(CreateUserOutcome::Created(user))
    }
}

#[derive(Default)]
struct Tables {
    projects: Vec<Project>, // insertion order == creation order
    tasks: Vec<Task>,
}

impl Tables {
    fn with_tasks(&self, project: Project) -> ProjectWithTasks {
        let tasks = self
            .tasks
            .iter()
            .filter(|t| t.project_id == project.id)
            .cloned()
            .collect();
        ProjectWithTasks { project, tasks }
    }
}

/// Backs both `ProjectStore` and `TaskStore` so cascades behave like the database.
#[derive(Clone, Default)]
pub struct MemoryProjectStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryProjectStore {
    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| anyhow::anyhow!("poisoned"))
    }
}

fn passes_filter(project: &Project, filter: &ProjectFilter) -> bool {
    let status_ok = filter.status.map_or(true, |s| project.status == s);
    let search_ok = filter.search.as_deref().map_or(true, |q| {
        let q = q.to_lowercase();
        project.title.to_lowercase().contains(&q) || project.description.to_lowercase().contains(&q)
    });
    status_ok && search_ok
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn list(&self, owner: Uuid, filter: &ProjectFilter) -> anyhow::Result<Vec<ProjectWithTasks>> {
        let tables = self.lock()?;
        let projects: Vec<Project> = tables
            .projects
            .iter()
            .rev()
            .filter(|p| p.user_id == owner && passes_filter(p, filter))
            .cloned()
            .collect();
        let tasks = tables.tasks.iter().filter(|t| t.user_id == owner).cloned().collect();
        Ok(attach_tasks(projects, tasks))
    }

    async fn create(&self, owner: Uuid, new: NewProject) -> anyhow::Result<ProjectWithTasks> {
        let project = Project {
            id: Uuid::new_v4(),
            user_id: owner,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            deadline: new.deadline,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock()?.projects.push(project.clone());
        Ok(ProjectWithTasks {
            project,
            tasks: Vec::new(),
        })
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<ProjectWithTasks>> {
        let tables = self.lock()?;
        let found = tables
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == owner)
            .cloned();
        Ok(found.map(|p| tables.with_tasks(p)))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ProjectPatch,
    ) -> anyhow::Result<Option<ProjectWithTasks>> {
        let mut tables = self.lock()?;
        let Some(p) = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            p.title = title;
        }
        if let Some(description) = patch.description {
            p.description = description;
        }
        if let Some(status) = patch.status {
            p.status = status;
        }
        if let Some(priority) = patch.priority {
            p.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            p.deadline = deadline;
        }
        let updated = p.clone();
        Ok(Some(tables.with_tasks(updated)))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.projects.len();
        tables.projects.retain(|p| !(p.id == id && p.user_id == owner));
        if tables.projects.len() == before {
            return Ok(false);
        }
        tables.tasks.retain(|t| t.project_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for MemoryProjectStore {
    async fn create(&self, owner: Uuid, project_id: Uuid, text: String) -> anyhow::Result<Option<Task>> {
        let mut tables = self.lock()?;
        if !tables
            .projects
            .iter()
            .any(|p| p.id == project_id && p.user_id == owner)
        {
            return Ok(None);
        }
        let task = Task {
            id: Uuid::new_v4(),
            project_id,
            user_id: owner,
            text,
            completed: false,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.tasks.push(task.clone());
        Ok(Some(task))
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> anyhow::Result<Option<Task>> {
        let mut tables = self.lock()?;
        let Some(t) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
        else {
            return Ok(None);
        };
        if let Some(text) = patch.text {
            t.text = text;
        }
        if let Some(completed) = patch.completed {
            t.completed = completed;
        }
        Ok(Some(t.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(tables.tasks.len() != before)
    }
}
