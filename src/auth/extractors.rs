use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::{cookies::SESSION_COOKIE, jwt::TokenCodec};
use crate::error::AppError;

/// Session token from the `auth-token` cookie, if the request carries one.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Verifies the session cookie and yields the user ID it was issued for.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenCodec: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let codec = TokenCodec::from_ref(state);
        match codec.verify(&token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(reason) => {
                warn!(reason = %reason, "session cookie refused");
                Err(AppError::Unauthorized("Invalid token".into()))
            }
        }
    }
}
