use axum::extract::{Extension, Json, Path, State};
use axum_extra::extract::WithRejection;

use crate::{
    AppState, database::Article, error::AppError, middleware::Session, routes::JsonId,
};

use super::model::DoctorProfileResponse;

#[axum::debug_handler]
pub async fn doctor_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<JsonId>, AppError>,
) -> Result<Json<DoctorProfileResponse>, AppError> {
    let doctor_info = state
        .repo
        .find_doctor(doctor_id.0)
        .await?
        .ok_or(AppError::NotFound("doctor"))?;

    Ok(Json(DoctorProfileResponse {
        doctor_info,
        own_profile: session.owns_doctor_profile(doctor_id.0),
    }))
}

#[axum::debug_handler]
pub async fn doctor_articles(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<JsonId>, AppError>,
) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(state.repo.list_doctor_articles(doctor_id.0).await?))
}

#[axum::debug_handler]
pub async fn more_doctor_articles(
    State(state): State<AppState>,
    WithRejection(Path((doctor_id, smallest_id)), _): WithRejection<Path<(i32, JsonId)>, AppError>,
) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(
        state
            .repo
            .list_more_doctor_articles(doctor_id, smallest_id.0)
            .await?,
    ))
}
