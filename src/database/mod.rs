pub mod models;
mod postgres;

use async_trait::async_trait;

pub use models::{Article, ArticleText, NewArticle, Profile};
pub use postgres::{ARTICLE_PAGE_SIZE, PgRepository};

/// Data access used by the route handlers.
///
/// Feed pages are keyset-paginated: `list_more_*` return rows with `id < before`,
/// newest first, at most one page long.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Seeded account used by the placeholder login endpoints.
    async fn fake_login(&self, doctor: bool) -> Result<Option<Profile>, sqlx::Error>;

    async fn find_doctor(&self, doctor_id: i32) -> Result<Option<Profile>, sqlx::Error>;

    async fn find_user(&self, user_id: i32) -> Result<Option<Profile>, sqlx::Error>;

    async fn list_articles(&self) -> Result<Vec<Article>, sqlx::Error>;

    async fn list_more_articles(&self, before: i32) -> Result<Vec<Article>, sqlx::Error>;

    async fn get_article(&self, article_id: i32) -> Result<Option<Article>, sqlx::Error>;

    async fn list_doctor_articles(&self, doctor_id: i32) -> Result<Vec<Article>, sqlx::Error>;

    async fn list_more_doctor_articles(
        &self,
        doctor_id: i32,
        before: i32,
    ) -> Result<Vec<Article>, sqlx::Error>;

    async fn insert_article(&self, article: NewArticle) -> Result<Article, sqlx::Error>;

    async fn update_article_with_image(
        &self,
        article_id: i32,
        text: ArticleText,
        image_url: String,
    ) -> Result<Option<Article>, sqlx::Error>;

    async fn update_article_text(
        &self,
        article_id: i32,
        text: ArticleText,
    ) -> Result<Option<Article>, sqlx::Error>;
}
