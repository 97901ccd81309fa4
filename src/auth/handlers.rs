use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MeResponse, MessageResponse, RegisterRequest,
            VerifiedUser, VerifyResponse,
        },
        extractors::{session_token, AuthUser},
    },
    error::{AppError, AppJson, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/verify", get(verify))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .auth
        .register(&payload.email, &payload.name, &payload.password)
        .await?;
    Ok(Json(AuthResponse {
        message: "User created successfully",
        user,
    }))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let (user, token) = state.auth.login(&payload.email, &payload.password).await?;
    let jar = jar.add(state.cookies.with_expiry(&token));
    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful",
            user,
        }),
    ))
}

/// Tokens are not revoked server-side; dropping the cookie ends the session for this browser.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!("user logged out");
    (
        jar.add(state.cookies.with_immediate_expiry()),
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MeResponse>> {
    match state.auth.find_user(user_id).await? {
        Some(user) => Ok(Json(MeResponse { user })),
        None => {
            warn!(%user_id, "session refers to a missing user");
            Err(AppError::NotFound("User not found".into()))
        }
    }
}

#[instrument(skip(state, jar))]
pub async fn verify(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = session_token(&jar) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse {
                valid: false,
                user: None,
                error: Some("Token not found"),
            }),
        )
            .into_response();
    };

    let status = state.auth.verify_session(Some(&token));
    match status.user_id {
        Some(user_id) if status.valid => Json(VerifyResponse {
            valid: true,
            user: Some(VerifiedUser { user_id }),
            error: None,
        })
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse {
                valid: false,
                user: None,
                error: Some("Invalid token"),
            }),
        )
            .into_response(),
    }
}
