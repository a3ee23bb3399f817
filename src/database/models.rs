use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_first: String,
    pub author_last: String,
}

/// A row from `users`. Doctors and plain users share the table and differ by `doctor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i32,
    pub first: String,
    pub last: String,
    pub email: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub doctor: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub author_id: i32,
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub image_url: String,
}

/// Text fields of an article, already checked for presence.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleText {
    pub title: String,
    pub subtitle: String,
    pub text: String,
}
