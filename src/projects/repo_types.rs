use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::tasks::repo_types::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Project record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    #[serde(with = "deadline")]
    pub deadline: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A project together with its tasks, oldest task first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

/// Validated input for a new project; defaults already applied.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub deadline: Option<Date>,
}

/// Partial update. `deadline: Some(None)` clears the deadline.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub deadline: Option<Option<Date>>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

/// Deadlines travel as `YYYY-MM-DD`. Input may also be an RFC 3339 timestamp,
/// in which case its calendar date is kept as written.
pub mod deadline {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::Rfc3339, macros::format_description, Date,
        OffsetDateTime,
    };

    pub fn parse(raw: &str) -> Option<Date> {
        let raw = raw.trim();
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .ok()
            .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|dt| dt.date()))
    }

    pub fn format(date: Date) -> String {
        date.format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| date.to_string())
    }

    pub fn serialize<S: Serializer>(value: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&format(*d)),
            None => s.serialize_none(),
        }
    }

    /// Missing, `null` and `""` all mean "no deadline".
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid deadline: {s}"))),
        }
    }

    /// For patches: absent field is `None` (via `#[serde(default)]`), `null` is `Some(None)`.
    pub fn deserialize_patch<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Option<Date>>, D::Error> {
        deserialize(d).map(Some)
    }
}
