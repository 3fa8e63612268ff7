use std::num::NonZeroUsize;

use anyhow::{bail, Context, Result};

use crate::listings::pagination::DEFAULT_JOBS_PER_PAGE;

const DEFAULT_FEATURED_JOBS_LIMIT: usize = 6;

/// Connection settings for the persistent backends.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

/// Which implementation sits behind the data-source traits.
#[derive(Debug, Clone)]
pub enum DataBackend {
    /// PostgreSQL for records, Redis for saved jobs, S3 for resume files.
    Postgres(PostgresBackend),
    /// Process-local stores. Nothing survives a restart.
    Memory,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable required by the selected backend is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: DataBackend,
    pub port: u16,
    pub rust_log: String,
    pub jobs_per_page: NonZeroUsize,
    pub featured_jobs_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = match optional_env("DATA_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => DataBackend::Postgres(PostgresBackend {
                database_url: require_env("DATABASE_URL")?,
                redis_url: require_env("REDIS_URL")?,
                s3_bucket: require_env("S3_BUCKET")?,
                s3_endpoint: require_env("S3_ENDPOINT")?,
                aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            "memory" => DataBackend::Memory,
            other => bail!("DATA_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        Ok(Config {
            backend,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            jobs_per_page: parse_page_size(optional_env("JOBS_PER_PAGE").as_deref())?,
            featured_jobs_limit: match optional_env("FEATURED_JOBS_LIMIT") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("FEATURED_JOBS_LIMIT must be a non-negative integer")?,
                None => DEFAULT_FEATURED_JOBS_LIMIT,
            },
        })
    }

    /// Memory backend with default limits.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Config {
            backend: DataBackend::Memory,
            port: 8080,
            rust_log: "info".to_string(),
            jobs_per_page: NonZeroUsize::new(DEFAULT_JOBS_PER_PAGE)
                .unwrap_or(NonZeroUsize::MIN),
            featured_jobs_limit: DEFAULT_FEATURED_JOBS_LIMIT,
        }
    }
}

fn parse_page_size(raw: Option<&str>) -> Result<NonZeroUsize> {
    let size = match raw {
        Some(raw) => raw
            .parse::<usize>()
            .context("JOBS_PER_PAGE must be a positive integer")?,
        None => DEFAULT_JOBS_PER_PAGE,
    };
    NonZeroUsize::new(size).context("JOBS_PER_PAGE must be greater than zero")
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_defaults_to_eight() {
        assert_eq!(parse_page_size(None).unwrap().get(), 8);
    }

    #[test]
    fn test_page_size_rejects_zero() {
        assert!(parse_page_size(Some("0")).is_err());
    }

    #[test]
    fn test_page_size_rejects_garbage() {
        assert!(parse_page_size(Some("eight")).is_err());
    }

    #[test]
    fn test_in_memory_config_uses_defaults() {
        let config = Config::in_memory();
        assert!(matches!(config.backend, DataBackend::Memory));
        assert_eq!(config.jobs_per_page.get(), 8);
        assert_eq!(config.featured_jobs_limit, 6);
    }
}
