use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use crate::{
    AppState,
    config::Config,
    error::AppError,
    utils::{generate_session_token, verify_session_token},
};

pub const SESSION_COOKIE: &str = "session";

/// Identity of the requesting client, decoded from the session cookie.
///
/// `user_id` and `doctor` are either both set or both unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Option<i32>,
    pub doctor: Option<bool>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: i32, doctor: bool) -> Self {
        Self {
            user_id: Some(user_id),
            doctor: Some(doctor),
        }
    }

    /// `(user_id, doctor)` of a signed-in client.
    pub fn require_user(&self) -> Result<(i32, bool), AppError> {
        match (self.user_id, self.doctor) {
            (Some(user_id), Some(doctor)) => Ok((user_id, doctor)),
            _ => Err(AppError::Unauthenticated),
        }
    }

    /// Id of a signed-in doctor.
    pub fn require_doctor(&self) -> Result<i32, AppError> {
        match self.require_user()? {
            (user_id, true) => Ok(user_id),
            (_, false) => Err(AppError::Forbidden),
        }
    }

    pub fn owns_doctor_profile(&self, doctor_id: i32) -> bool {
        self.doctor == Some(true) && self.user_id == Some(doctor_id)
    }

    fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Self {
        match verify_session_token(cookie.value(), config) {
            Ok(claims) => Self::signed_in(claims.sub, claims.doctor),
            Err(e) => {
                tracing::debug!("Ignoring invalid session cookie: {}", e);
                Self::anonymous()
            }
        }
    }
}

/// Cookie holding a freshly signed session for `user_id`.
pub fn session_cookie(
    user_id: i32,
    doctor: bool,
    config: &Config,
) -> Result<Cookie<'static>, AppError> {
    let (token, _) = generate_session_token(user_id, doctor, config)
        .map_err(|e| AppError::Internal(format!("failed to sign session: {}", e)))?;

    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.session_ttl_secs()))
        .build())
}

/// Cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

fn sets_session_cookie(response: &Response) -> bool {
    let prefix = format!("{}=", SESSION_COOKIE);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}

/// Decodes the session once per request and hands it to handlers as an
/// `Extension<Session>`. Valid sessions are re-issued on the way out so the
/// expiry window rolls forward, unless the handler already wrote the cookie.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = jar
        .get(SESSION_COOKIE)
        .map(|cookie| Session::from_cookie(cookie, &state.config))
        .unwrap_or_default();
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;

    if let (Some(user_id), Some(doctor)) = (session.user_id, session.doctor) {
        if !sets_session_cookie(&response) {
            match session_cookie(user_id, doctor, &state.config) {
                Ok(cookie) => {
                    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                        response.headers_mut().append(SET_COOKIE, value);
                    }
                }
                Err(e) => tracing::warn!("Failed to roll session for user {}: {}", user_id, e),
            }
        }
    }

    response
}
