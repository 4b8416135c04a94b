use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{RetryPolicy, GEMINI_API_BASE};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub llm_max_attempts: u32,
    pub llm_backoff_base_ms: u64,
    pub llm_backoff_max_ms: u64,
    pub llm_timeout_secs: u64,
    /// Delay of the simulated payment before the result unlocks.
    pub payment_delay_ms: u64,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| GEMINI_API_BASE.to_string()),
            llm_max_attempts: parse_var("LLM_MAX_ATTEMPTS", optional_env("LLM_MAX_ATTEMPTS"), 3)?,
            llm_backoff_base_ms: parse_var(
                "LLM_BACKOFF_BASE_MS",
                optional_env("LLM_BACKOFF_BASE_MS"),
                1000,
            )?,
            llm_backoff_max_ms: parse_var(
                "LLM_BACKOFF_MAX_MS",
                optional_env("LLM_BACKOFF_MAX_MS"),
                8000,
            )?,
            llm_timeout_secs: parse_var("LLM_TIMEOUT_SECS", optional_env("LLM_TIMEOUT_SECS"), 120)?,
            payment_delay_ms: parse_var(
                "PAYMENT_DELAY_MS",
                optional_env("PAYMENT_DELAY_MS"),
                1500,
            )?,
            session_ttl_secs: parse_var(
                "SESSION_TTL_SECS",
                optional_env("SESSION_TTL_SECS"),
                3600,
            )?,
            port: parse_var("PORT", optional_env("PORT"), 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.llm_max_attempts.max(1),
            base_delay: Duration::from_millis(self.llm_backoff_base_ms),
            max_delay: Duration::from_millis(self.llm_backoff_max_ms),
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Fast timings so timer-driven tests finish quickly.
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_base: GEMINI_API_BASE.to_string(),
            llm_max_attempts: 1,
            llm_backoff_base_ms: 1,
            llm_backoff_max_ms: 1,
            llm_timeout_secs: 5,
            payment_delay_ms: 1500,
            session_ttl_secs: 3600,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        let port: u16 = parse_var("PORT", None, 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_var_parses_trimmed_value() {
        let attempts: u32 = parse_var("LLM_MAX_ATTEMPTS", Some(" 5 ".to_string()), 3).unwrap();
        assert_eq!(attempts, 5);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let err = parse_var::<u64>("PAYMENT_DELAY_MS", Some("soon".to_string()), 1500).unwrap_err();
        assert!(err.to_string().contains("PAYMENT_DELAY_MS"));
    }

    #[test]
    fn test_retry_policy_never_drops_below_one_attempt() {
        let mut config = Config::for_tests();
        config.llm_max_attempts = 0;
        assert_eq!(config.retry_policy().max_attempts, 1);
    }
}
