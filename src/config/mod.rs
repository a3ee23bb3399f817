use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Fallback signing secret used when `SECRET` is not set. Only fit for local development.
pub const INSECURE_DEFAULT_SECRET: &str = "I'm always angry.";

pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 2 * 1024 * 1024;

pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 14 * 24 * 3600;

// Upper bound keeps the value representable by chrono and cookie durations.
const MAX_SESSION_MAX_AGE_SECS: u64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub session_secret: String,
    pub session_max_age_secs: u64,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: String,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
    pub redis_url: Option<String>,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let session_secret = env::var("SECRET").unwrap_or_else(|_| {
            tracing::warn!("SECRET is not set, falling back to the built-in development secret");
            INSECURE_DEFAULT_SECRET.to_string()
        });
        let session_max_age_secs =
            session_max_age_from_days(env::var("SESSION_MAX_AGE_DAYS").ok().as_deref());

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            session_secret,
            session_max_age_secs,
            s3_bucket: env::var("S3_BUCKET")?,
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://s3.amazonaws.com".into()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            upload_max_bytes: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_UPLOAD_MAX_BYTES),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "client/public".into())
                .into(),
            index_file: env::var("INDEX_FILE")
                .unwrap_or_else(|_| "client/index.html".into())
                .into(),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        })
    }

    /// Session lifetime in seconds, as the signed types the token and cookie use.
    pub fn session_ttl_secs(&self) -> i64 {
        let secs = if self.session_max_age_secs <= MAX_SESSION_MAX_AGE_SECS {
            self.session_max_age_secs
        } else {
            DEFAULT_SESSION_MAX_AGE_SECS
        };
        i64::try_from(secs).unwrap_or(DEFAULT_SESSION_MAX_AGE_SECS as i64)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    /// Public URL of an object relayed to the configured bucket.
    pub fn public_object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.s3_public_base_url.trim_end_matches('/'),
            self.s3_bucket,
            key
        )
    }
}

/// Parses `SESSION_MAX_AGE_DAYS` (`"14"` or `"14d"`). Missing, malformed or
/// out-of-range values fall back to 14 days.
fn session_max_age_from_days(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().trim_end_matches('d').parse::<u64>().ok())
        .and_then(|days| days.checked_mul(24 * 3600))
        .filter(|secs| (1..=MAX_SESSION_MAX_AGE_SECS).contains(secs))
        .unwrap_or_else(|| {
            if raw.is_some() {
                tracing::warn!("Ignoring invalid SESSION_MAX_AGE_DAYS, using 14 days");
            }
            DEFAULT_SESSION_MAX_AGE_SECS
        })
}
