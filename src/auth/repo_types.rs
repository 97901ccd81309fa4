use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub email: String,              // unique, stored as given
    pub name: String,               // display name
    pub password_hash: String,      // Argon2 PHC string, never leaves the auth module
    pub avatar: Option<String>,     // avatar URL, if any
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            avatar: u.avatar,
            created_at: u.created_at,
        }
    }
}

/// Outcome of inserting a user.
#[derive(Debug)]
pub enum CreateUserOutcome {
    Created(User),
    DuplicateEmail,
}
