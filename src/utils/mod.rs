use std::path::Path;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Number of random bytes behind every staged upload name.
pub const UPLOAD_NAME_BYTES: usize = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i32,     // user id
    pub doctor: bool, // doctor flag
    pub exp: i64,     // expiry
    pub iat: i64,     // issued at
}

pub fn generate_session_token(
    user_id: i32,
    doctor: bool,
    config: &Config,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiration = (now + Duration::seconds(config.session_ttl_secs())).timestamp();

    let claims = SessionClaims {
        sub: user_id,
        doctor,
        exp: expiration,
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )?;

    Ok((token, expiration))
}

pub fn verify_session_token(
    token: &str,
    config: &Config,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Random file name for a staged upload, keeping the original extension.
///
/// Extensions that are not short and alphanumeric are dropped so the name is
/// always safe to use as a path component and an object key.
pub fn random_file_name(original: &str) -> String {
    let mut bytes = [0u8; UPLOAD_NAME_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let stem = hex::encode(bytes);

    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
