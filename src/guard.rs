//! Server-side route guard for page requests.
//!
//! API routes authenticate inside their handlers; every other non-public path
//! needs a live session or is redirected to the login page.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{auth::extractors::session_token, state::AppState};

pub const LOGIN_PATH: &str = "/login";

const PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/register",
    "/api/auth/login",
    "/api/auth/register",
    "/assets/",
    "/favicon.ico",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Api,
    Protected,
}

/// `/login` covers `/login` and `/login/...`, never `/loginx`. Entries ending in `/`
/// match anything below them.
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn classify(path: &str) -> Access {
    if PUBLIC_PREFIXES.iter().any(|p| under(path, p)) {
        Access::Public
    } else if path.starts_with("/api/") {
        Access::Api
    } else {
        Access::Protected
    }
}

pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if classify(&path) != Access::Protected {
        return next.run(request).await;
    }

    let token = session_token(&jar);
    match state.auth.resolve_session(token.as_deref()).await {
        Some(user) => {
            debug!(user_id = %user.id, %path, "page access granted");
            next.run(request).await
        }
        None => {
            debug!(%path, "no live session; redirecting to login");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        for p in [
            "/login",
            "/register",
            "/api/auth/login",
            "/api/auth/register",
            "/assets/app.js",
            "/favicon.ico",
            "/login/",
        ] {
            assert_eq!(classify(p), Access::Public, "{p}");
        }
    }

    #[test]
    fn api_paths_authenticate_themselves() {
        for p in ["/api/projects", "/api/auth/me", "/api/tasks/1", "/api/health"] {
            assert_eq!(classify(p), Access::Api, "{p}");
        }
    }

    #[test]
    fn everything_else_is_protected() {
        for p in [
            "/",
            "/projects/123",
            "/dashboard",
            "/api",
            "/loginx",
            "/register-anything",
            "/favicon.icon",
        ] {
            assert_eq!(classify(p), Access::Protected, "{p}");
        }
    }
}
