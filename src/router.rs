use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    AppState,
    middleware::{log_errors, session_middleware},
    routes,
};

// Room for the text fields that travel alongside the file.
const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

// Session and profile routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/id.json", get(routes::user::session_identity))
        .route("/add-doctor.json", post(routes::user::add_doctor))
        .route("/add-user.json", post(routes::user::add_user))
        .route("/user.json", get(routes::user::current_user))
        .route("/logout", get(routes::user::logout))
}

// Feed, publishing and editing
fn article_routes(upload_limit: usize) -> Router<AppState> {
    let body_limit = DefaultBodyLimit::max(upload_limit + FORM_FIELDS_ALLOWANCE);

    Router::new()
        .route("/articles.json", get(routes::article::list_articles))
        .route(
            "/more-articles/{smallest_id}",
            get(routes::article::list_more_articles),
        )
        .route(
            "/single-article/{article_id}",
            get(routes::article::single_article),
        )
        .route(
            "/add-new-article.json",
            post(routes::article::add_new_article).layer(body_limit),
        )
        .route(
            "/edit-article/{article_id}",
            get(routes::article::article_for_edit),
        )
        .route(
            "/edit-article-with-pic.json",
            post(routes::article::edit_article_with_pic).layer(body_limit),
        )
        .route(
            "/edit-article-text.json",
            post(routes::article::edit_article_text),
        )
}

// Doctor profiles and their articles
fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/doctor/{doctor_id}", get(routes::doctor::doctor_profile))
        .route(
            "/doctor-articles/{doctor_id}",
            get(routes::doctor::doctor_articles),
        )
        .route(
            "/more-doctor-articles/{doctor_id}/{smallest_id}",
            get(routes::doctor::more_doctor_articles),
        )
}

/// Full application router: API routes, the session layer and the client
/// bundle as fallback for everything else.
pub fn create_router(state: AppState) -> Router {
    let client_bundle = ServeDir::new(&state.config.static_dir)
        .fallback(ServeFile::new(&state.config.index_file));

    Router::new()
        .merge(user_routes())
        .merge(article_routes(state.config.upload_max_bytes))
        .merge(doctor_routes())
        .fallback_service(client_bundle)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(axum::middleware::from_fn(log_errors))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
