use axum::{
    extract::{Extension, Json, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    database::Profile,
    error::AppError,
    middleware::{Session, removal_cookie, session_cookie},
};

/// Identity of the current session; both fields are null when signed out.
#[axum::debug_handler]
pub async fn session_identity(Extension(session): Extension<Session>) -> Json<Session> {
    Json(session)
}

async fn placeholder_login(
    state: &AppState,
    jar: CookieJar,
    doctor: bool,
) -> Result<(CookieJar, Json<Profile>), AppError> {
    let profile = state
        .repo
        .fake_login(doctor)
        .await?
        .ok_or(AppError::NotFound("seeded account"))?;

    let cookie = session_cookie(profile.id, profile.doctor, &state.config)?;
    tracing::info!(
        "Placeholder login as user {} (doctor: {})",
        profile.id,
        profile.doctor
    );

    Ok((jar.add(cookie), Json(profile)))
}

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Profile>), AppError> {
    placeholder_login(&state, jar, true).await
}

#[axum::debug_handler]
pub async fn add_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Profile>), AppError> {
    placeholder_login(&state, jar, false).await
}

/// Profile row of the signed-in client, doctor or plain user.
#[axum::debug_handler]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Profile>, AppError> {
    let (user_id, doctor) = session.require_user()?;

    let profile = if doctor {
        state.repo.find_doctor(user_id).await?
    } else {
        state.repo.find_user(user_id).await?
    };

    profile.map(Json).ok_or(AppError::NotFound("user"))
}

#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(removal_cookie()), Redirect::to("/"))
}
