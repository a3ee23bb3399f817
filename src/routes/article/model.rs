use serde::Deserialize;
use serde_json::Value;

use crate::{
    database::ArticleText,
    error::AppError,
    upload::{parse_article_id, require_text},
};

/// Body of `POST /edit-article-text.json`. `articleId` may arrive as a number
/// or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditArticleTextRequest {
    #[serde(default)]
    pub article_id: Value,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text: Option<String>,
}

impl EditArticleTextRequest {
    pub fn validated_text(&self) -> Result<ArticleText, AppError> {
        require_text(
            self.title.as_deref(),
            self.subtitle.as_deref(),
            self.text.as_deref(),
        )
    }

    pub fn article_id(&self) -> Result<i32, AppError> {
        let raw = match &self.article_id {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        };
        parse_article_id(raw.as_deref())
    }
}
