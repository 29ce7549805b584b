use super::JsonBody;
use crate::error::ApiResult;
use crate::session::{removal_cookie, session_cookie, session_id};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use racetrack_core::SessionUser;
use racetrack_core::validation::CredentialsForm;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// # POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<CredentialsForm>,
) -> ApiResult<Json<Value>> {
    state.auth.register(&form).await?;
    Ok(Json(json!({ "success": true, "message": "User created" })))
}

/// # POST /api/auth/login
///
/// Always issues a new session id; the one the client sent is destroyed.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(form): JsonBody<CredentialsForm>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let previous = session_id(&jar);
    let login = state.auth.login(&form, previous.as_deref()).await?;

    let cookie = session_cookie(login.sid, state.auth.session_ttl(), state.secure_cookies);
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Logged in".to_string(),
            user: login.user,
        }),
    ))
}

/// # POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<Value>)> {
    state.auth.logout(session_id(&jar).as_deref()).await?;
    Ok((jar.remove(removal_cookie()), Json(json!({ "success": true }))))
}

/// # GET /api/auth/me
///
/// Read-only: neither creates a session nor extends one.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Json<WhoAmI>> {
    let user = state.auth.whoami(session_id(&jar).as_deref()).await?;
    Ok(Json(WhoAmI {
        authenticated: user.is_some(),
        user,
    }))
}
