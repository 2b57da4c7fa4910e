use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Grant write retries
    pub grant_retry_attempts: u32,
    pub grant_retry_base_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            grant_retry_attempts: env::var("GRANT_RETRY_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("GRANT_RETRY_ATTEMPTS must be a number"),
            grant_retry_base_ms: env::var("GRANT_RETRY_BASE_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .expect("GRANT_RETRY_BASE_MS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
