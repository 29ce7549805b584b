//! Session cookie handling and the access-tier extractors.
//!
//! A handler that takes [`CurrentUser`] is in the Authenticated tier; one
//! that takes [`AdminUser`] is in the Admin tier. Both resolve the
//! `racetrack.sid` cookie through the auth service, which also slides the
//! session's expiry. [`refresh_cookie`] then re-issues the cookie so the
//! browser's copy slides with it.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, header::SET_COOKIE};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use racetrack_core::SessionUser;
use racetrack_core::constants::SESSION_COOKIE_NAME;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Session id presented by the client, if any
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|sid| !sid.is_empty())
}

/// Cookie carrying a freshly issued session id
pub fn session_cookie(sid: String, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, sid))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Template for clearing the session cookie with [`CookieJar::remove`]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
}

/// Request-scoped slot naming the session a tier extractor slid.
#[derive(Debug, Clone, Default)]
struct SlidSession(Arc<Mutex<Option<String>>>);

impl SlidSession {
    fn record(&self, sid: String) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(sid);
        }
    }

    fn take(&self) -> Option<String> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Middleware re-sending the session cookie with a fresh `Max-Age` after
/// a request that extended the session on the server.
pub async fn refresh_cookie(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let slid = SlidSession::default();
    request.extensions_mut().insert(slid.clone());

    let mut response = next.run(request).await;

    if let Some(sid) = slid.take() {
        let cookie = session_cookie(sid, state.auth.session_ttl(), state.secure_cookies);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Session cookie not refreshed"),
        }
    }

    response
}

async fn resolve(parts: &Parts, state: &AppState) -> ApiResult<Option<SessionUser>> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(sid) = session_id(&jar) else {
        return Ok(None);
    };

    let user = state.auth.authenticate(&sid).await?;
    if user.is_some()
        && let Some(slid) = parts.extensions.get::<SlidSession>()
    {
        slid.record(sid);
    }
    Ok(user)
}

/// Any logged-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> ApiResult<Self> {
        match resolve(parts, state).await? {
            Some(user) => Ok(Self(user)),
            None => Err(ApiError::Unauthorized(
                "Unauthorized: You must be logged in".to_string(),
            )),
        }
    }
}

/// A logged-in user holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> ApiResult<Self> {
        let Some(user) = resolve(parts, state).await? else {
            return Err(ApiError::Unauthorized("Unauthorized".to_string()));
        };

        if !user.is_admin() {
            warn!(user_id = user.id, path = %parts.uri.path(), "Admin route refused");
            return Err(ApiError::Forbidden("Access denied".to_string()));
        }

        Ok(Self(user))
    }
}
