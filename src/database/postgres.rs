use async_trait::async_trait;
use sqlx::PgPool;

use super::{Article, ArticleText, NewArticle, Profile, Repository};

/// Rows per feed page.
pub const ARTICLE_PAGE_SIZE: i64 = 10;

const PROFILE_COLUMNS: &str = "id, first, last, email, bio, image_url, doctor, created_at";

// `a` is either `articles` or a CTE with the same columns.
const ARTICLE_COLUMNS: &str = r#"
    a.id, a.author_id, a.title, a.subtitle, a.text, a.image_url, a.created_at,
    u.first AS author_first, u.last AS author_last
"#;

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn fake_login(&self, doctor: bool) -> Result<Option<Profile>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE doctor = $1 ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(doctor)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_doctor(&self, doctor_id: i32) -> Result<Option<Profile>, sqlx::Error> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1 AND doctor");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_user(&self, user_id: i32) -> Result<Option<Profile>, sqlx::Error> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1 AND NOT doctor");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_articles(&self) -> Result<Vec<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles a
            JOIN users u ON u.id = a.author_id
            ORDER BY a.id DESC
            LIMIT $1
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(ARTICLE_PAGE_SIZE)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_more_articles(&self, before: i32) -> Result<Vec<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles a
            JOIN users u ON u.id = a.author_id
            WHERE a.id < $1
            ORDER BY a.id DESC
            LIMIT $2
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(before)
            .bind(ARTICLE_PAGE_SIZE)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_article(&self, article_id: i32) -> Result<Option<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles a
            JOIN users u ON u.id = a.author_id
            WHERE a.id = $1
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_doctor_articles(&self, doctor_id: i32) -> Result<Vec<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles a
            JOIN users u ON u.id = a.author_id
            WHERE a.author_id = $1
            ORDER BY a.id DESC
            LIMIT $2
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(doctor_id)
            .bind(ARTICLE_PAGE_SIZE)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_more_doctor_articles(
        &self,
        doctor_id: i32,
        before: i32,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles a
            JOIN users u ON u.id = a.author_id
            WHERE a.author_id = $1 AND a.id < $2
            ORDER BY a.id DESC
            LIMIT $3
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(doctor_id)
            .bind(before)
            .bind(ARTICLE_PAGE_SIZE)
            .fetch_all(&self.pool)
            .await
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
        let sql = format!(
            r#"
            WITH a AS (
                INSERT INTO articles (author_id, title, subtitle, text, image_url)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {ARTICLE_COLUMNS}
            FROM a
            JOIN users u ON u.id = a.author_id
            "#
        );
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(article.author_id)
            .bind(article.title)
            .bind(article.subtitle)
            .bind(article.text)
            .bind(article.image_url)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Inserted article {} by doctor {}", row.id, row.author_id);
        Ok(row)
    }

    async fn update_article_with_image(
        &self,
        article_id: i32,
        text: ArticleText,
        image_url: String,
    ) -> Result<Option<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH a AS (
                UPDATE articles
                SET title = $2, subtitle = $3, text = $4, image_url = $5
                WHERE id = $1
                RETURNING *
            )
            SELECT {ARTICLE_COLUMNS}
            FROM a
            JOIN users u ON u.id = a.author_id
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article_id)
            .bind(text.title)
            .bind(text.subtitle)
            .bind(text.text)
            .bind(image_url)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_article_text(
        &self,
        article_id: i32,
        text: ArticleText,
    ) -> Result<Option<Article>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH a AS (
                UPDATE articles
                SET title = $2, subtitle = $3, text = $4
                WHERE id = $1
                RETURNING *
            )
            SELECT {ARTICLE_COLUMNS}
            FROM a
            JOIN users u ON u.id = a.author_id
            "#
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article_id)
            .bind(text.title)
            .bind(text.subtitle)
            .bind(text.text)
            .fetch_optional(&self.pool)
            .await
    }
}
