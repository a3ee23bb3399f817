use axum::{
    extract::{Extension, Json, Multipart, Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{
    AppState,
    database::{Article, NewArticle},
    error::AppError,
    middleware::Session,
    routes::JsonId,
    upload::{ArticleForm, store_image},
};

use super::model::EditArticleTextRequest;

#[axum::debug_handler]
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(state.repo.list_articles().await?))
}

#[axum::debug_handler]
pub async fn list_more_articles(
    State(state): State<AppState>,
    WithRejection(Path(smallest_id), _): WithRejection<Path<JsonId>, AppError>,
) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(state.repo.list_more_articles(smallest_id.0).await?))
}

#[axum::debug_handler]
pub async fn single_article(
    State(state): State<AppState>,
    WithRejection(Path(article_id), _): WithRejection<Path<JsonId>, AppError>,
) -> Result<Json<Article>, AppError> {
    state
        .repo
        .get_article(article_id.0)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("article"))
}

/// Load an article the signed-in doctor is allowed to edit.
async fn owned_article(
    state: &AppState,
    session: &Session,
    article_id: i32,
) -> Result<Article, AppError> {
    let doctor_id = session.require_doctor()?;

    let article = state
        .repo
        .get_article(article_id)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    if article.author_id != doctor_id {
        tracing::warn!(
            "Doctor {} tried to edit article {} owned by {}",
            doctor_id,
            article.id,
            article.author_id
        );
        return Err(AppError::Forbidden);
    }

    Ok(article)
}

#[axum::debug_handler]
pub async fn add_new_article(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let author_id = session.require_doctor()?;

    let mut form = ArticleForm::from_multipart(&mut multipart, state.config.upload_max_bytes).await?;
    let text = form.validated_text()?;
    let file = form.take_file()?;

    let image_url = store_image(&file, state.store.as_ref(), &state.config).await?;

    let article = state
        .repo
        .insert_article(NewArticle {
            author_id,
            title: text.title,
            subtitle: text.subtitle,
            text: text.text,
            image_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(article)))
}

#[axum::debug_handler]
pub async fn article_for_edit(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Path(article_id), _): WithRejection<Path<JsonId>, AppError>,
) -> Result<Json<Article>, AppError> {
    owned_article(&state, &session, article_id.0).await.map(Json)
}

#[axum::debug_handler]
pub async fn edit_article_with_pic(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<Article>, AppError> {
    session.require_doctor()?;

    let mut form = ArticleForm::from_multipart(&mut multipart, state.config.upload_max_bytes).await?;
    let text = form.validated_text()?;
    let article_id = form.article_id()?;
    let file = form.take_file()?;

    owned_article(&state, &session, article_id).await?;
    let image_url = store_image(&file, state.store.as_ref(), &state.config).await?;

    state
        .repo
        .update_article_with_image(article_id, text, image_url)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("article"))
}

#[axum::debug_handler]
pub async fn edit_article_text(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<EditArticleTextRequest>, AppError>,
) -> Result<Json<Article>, AppError> {
    session.require_doctor()?;

    let text = req.validated_text()?;
    let article_id = req.article_id()?;
    owned_article(&state, &session, article_id).await?;

    state
        .repo
        .update_article_text(article_id, text)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("article"))
}
