//! Multipart article submissions and the image relay.
//!
//! A submission moves through `parse -> validate -> stage -> relay`, each step
//! returning early with an [`AppError`]. Parsing enforces the file size cap, so
//! an oversized file never reaches validation or the object store.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};

use crate::{
    config::Config, database::ArticleText, error::AppError, storage::ObjectStore,
    utils::random_file_name,
};

pub const FILE_FIELD: &str = "file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Fields of a multipart publish or edit request.
#[derive(Debug, Default)]
pub struct ArticleForm {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text: Option<String>,
    pub article_id: Option<String>,
    pub file: Option<UploadedFile>,
}

fn multipart_error(e: MultipartError, max_file_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(max_file_bytes)
    } else {
        AppError::Validation(format!("Malformed form data: {}", e.body_text()))
    }
}

impl ArticleForm {
    /// Read every field of the form, buffering the single file field.
    pub async fn from_multipart(
        multipart: &mut Multipart,
        max_file_bytes: usize,
    ) -> Result<Self, AppError> {
        let mut form = ArticleForm::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_file_bytes))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                if form.file.is_some() {
                    return Err(AppError::Validation(
                        "Only one file may be uploaded.".to_string(),
                    ));
                }

                let original_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();

                let mut buf = BytesMut::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, max_file_bytes))?
                {
                    if buf.len() + chunk.len() > max_file_bytes {
                        return Err(AppError::PayloadTooLarge(max_file_bytes));
                    }
                    buf.extend_from_slice(&chunk);
                }

                form.file = Some(UploadedFile {
                    original_name,
                    content_type,
                    bytes: buf.freeze(),
                });
                continue;
            }

            let slot = match name.as_str() {
                "title" => &mut form.title,
                "subtitle" => &mut form.subtitle,
                "text" => &mut form.text,
                "articleId" => &mut form.article_id,
                _ => continue,
            };
            *slot = Some(
                field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_file_bytes))?,
            );
        }

        Ok(form)
    }

    pub fn validated_text(&self) -> Result<ArticleText, AppError> {
        require_text(
            self.title.as_deref(),
            self.subtitle.as_deref(),
            self.text.as_deref(),
        )
    }

    pub fn article_id(&self) -> Result<i32, AppError> {
        parse_article_id(self.article_id.as_deref())
    }

    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .filter(|file| !file.bytes.is_empty())
            .ok_or_else(|| AppError::Validation("An image file is required.".to_string()))
    }
}

/// Title, subtitle and text must all be present and not blank.
pub fn require_text(
    title: Option<&str>,
    subtitle: Option<&str>,
    text: Option<&str>,
) -> Result<ArticleText, AppError> {
    let filled = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    match (filled(title), filled(subtitle), filled(text)) {
        (Some(title), Some(subtitle), Some(text)) => Ok(ArticleText {
            title,
            subtitle,
            text,
        }),
        _ => Err(AppError::missing_fields()),
    }
}

pub fn parse_article_id(raw: Option<&str>) -> Result<i32, AppError> {
    raw.and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation("Invalid article id.".to_string()))
}

/// An upload written to the local staging directory.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

pub async fn stage(file: &UploadedFile, upload_dir: &Path) -> Result<StagedFile, AppError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload dir: {}", e)))?;

    let file_name = random_file_name(&file.original_name);
    let path = upload_dir.join(&file_name);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to stage upload: {}", e)))?;

    tracing::debug!(
        "Staged {} ({} bytes) as {}",
        file.original_name,
        file.bytes.len(),
        path.display()
    );

    Ok(StagedFile {
        path,
        file_name,
        content_type: file.content_type.clone(),
    })
}

/// Upload a staged file and return its public URL. The staged copy is removed
/// whatever the outcome.
pub async fn relay(
    staged: StagedFile,
    store: &dyn ObjectStore,
    config: &Config,
) -> Result<String, AppError> {
    let result = store
        .put(&staged.file_name, &staged.path, &staged.content_type)
        .await;

    if let Err(e) = tokio::fs::remove_file(&staged.path).await {
        tracing::warn!("Failed to remove staged file {}: {}", staged.path.display(), e);
    }

    result?;
    Ok(config.public_object_url(&staged.file_name))
}

/// Stage and relay an image, yielding the URL to store on the article.
pub async fn store_image(
    file: &UploadedFile,
    store: &dyn ObjectStore,
    config: &Config,
) -> Result<String, AppError> {
    let staged = stage(file, &config.upload_dir).await?;
    relay(staged, store, config).await
}
