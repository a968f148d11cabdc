use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub skills_path: String,
    /// External NER service. When unset the in-process heuristic recognizer is used.
    pub ner_endpoint: Option<String>,
    pub ner_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skills_path: std::env::var("SKILLS_PATH")
                .unwrap_or_else(|_| "skills.json".to_string()),
            ner_endpoint: std::env::var("NER_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            ner_timeout: Duration::from_secs(
                parse_env("NER_TIMEOUT_SECS", 10)
                    .context("NER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let v: u16 = parse_env("SIFT_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(v, 8080);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("SIFT_TEST_PORT_VALUE", " 9090 ");
        let v: u16 = parse_env("SIFT_TEST_PORT_VALUE", 8080).unwrap();
        assert_eq!(v, 9090);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SIFT_TEST_BAD_VALUE", "eighty");
        assert!(parse_env::<u16>("SIFT_TEST_BAD_VALUE", 8080).is_err());
    }
}
