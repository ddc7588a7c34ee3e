use anyhow::{Context, Result};

/// Hard cap on results requested from the job provider, regardless of config.
pub const MAX_RESULT_COUNT: u32 = 100;

/// Application configuration loaded from environment variables.
/// Provider and classifier credentials are optional: a missing provider key
/// puts the job source in fallback mode, a missing classifier key makes
/// ingestion degrade to a profile-less success.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub serp_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    /// Auto-search tick period in milliseconds. Default: 2 hours.
    pub search_interval_ms: u64,
    /// Maximum new applications per user per calendar day.
    pub daily_apply_limit: u32,
    /// Default provider result count, capped at `MAX_RESULT_COUNT`.
    pub jobs_default_num: u32,
    pub search_location: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            serp_api_key: std::env::var("SERP_API_KEY").ok(),
            groq_api_key: std::env::var("GROQ_API_KEY").ok(),
            search_interval_ms: parse_env("AUTO_SEARCH_INTERVAL_MS", 7_200_000)?,
            daily_apply_limit: parse_env("DAILY_APPLY_LIMIT", 30)?,
            jobs_default_num: parse_env::<u32>("JOBS_DEFAULT_NUM", MAX_RESULT_COUNT)?
                .min(MAX_RESULT_COUNT),
            search_location: std::env::var("SEARCH_LOCATION")
                .unwrap_or_else(|_| "India".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
