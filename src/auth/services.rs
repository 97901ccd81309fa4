use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::{
    jwt::TokenCodec,
    password::{dummy_hash, hash_password, verify_password},
    repo::UserStore,
    repo_types::{CreateUserOutcome, PublicUser},
};
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::DuplicateEmail => AppError::Conflict("Email is already in use".into()),
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::Internal(e) => AppError::Internal(e),
        }
    }
}

/// Result of the lightweight "am I logged in" probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub valid: bool,
    pub user_id: Option<Uuid>,
}

/// Registration, login and session resolution over the credential store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

pub(crate) fn validate_registration(email: &str, name: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || name.trim().is_empty() || password.is_empty() {
        return Err(AuthError::Validation("All fields are required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation("Invalid email".into()));
    }
    Ok(())
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        dummy_hash();
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<PublicUser, AuthError> {
        if let Err(e) = validate_registration(email, name, password) {
            warn!(error = %e, "registration rejected");
            return Err(e);
        }

        let hash = hash_password(password)?;
        match self.users.create(email, name, &hash).await? {
            CreateUserOutcome::Created(user) => {
                info!(user_id = %user.id, "user registered");
                Ok(user.into())
            }
            CreateUserOutcome::DuplicateEmail => {
                warn!("email already registered");
                Err(AuthError::DuplicateEmail)
            }
        }
    }

    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<(PublicUser, String), AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".into()));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            // Same Argon2 cost as a real mismatch.
            verify_password(password, dummy_hash());
            warn!("login with unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "login with invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user.into(), token))
    }

    pub async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<PublicUser>> {
        Ok(self.users.find_by_id(user_id).await?.map(PublicUser::from))
    }

    /// Resolve a session token to its user. Absent, invalid or expired tokens,
    /// deleted users and store failures all yield `None`.
    pub async fn resolve_session(&self, token: Option<&str>) -> Option<PublicUser> {
        let claims = self.tokens.verify(token?).ok()?;
        match self.find_user(claims.sub).await {
            Ok(user) => {
                if user.is_none() {
                    debug!(user_id = %claims.sub, "session refers to a missing user");
                }
                user
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), user_id = %claims.sub, "session lookup failed");
                None
            }
        }
    }

    /// Token-only check; does not touch the credential store.
    pub fn verify_session(&self, token: Option<&str>) -> SessionStatus {
        match token.map(|t| self.tokens.verify(t)) {
            Some(Ok(claims)) => SessionStatus {
                valid: true,
                user_id: Some(claims.sub),
            },
            _ => SessionStatus {
                valid: false,
                user_id: None,
            },
        }
    }
}
