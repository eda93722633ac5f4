use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Built once at startup and handed to handlers through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    /// Job search is disabled when unset.
    pub tavily_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub staging_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub search_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_upload_mb = get("MAX_UPLOAD_MB")
            .unwrap_or_else(|| "10".to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;

        let search_interval_ms = get("SEARCH_INTERVAL_MS")
            .unwrap_or_else(|| "500".to_string())
            .parse::<u64>()
            .context("SEARCH_INTERVAL_MS must be a whole number of milliseconds")?;

        Ok(Config {
            groq_api_key: get("GROQ_API_KEY")
                .context("Required environment variable 'GROQ_API_KEY' is not set")?,
            tavily_api_key: get("TAVILY_API_KEY"),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            staging_dir: get("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: max_upload_mb
                .checked_mul(1024 * 1024)
                .context("MAX_UPLOAD_MB is too large")?,
            search_interval: Duration::from_millis(search_interval_ms),
        })
    }

    pub fn search_enabled(&self) -> bool {
        self.tavily_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_groq_key_is_fatal() {
        let err = config_from(&[("TAVILY_API_KEY", "tvly-123")]).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_defaults_apply_when_only_groq_key_set() {
        let config = config_from(&[("GROQ_API_KEY", "gsk-abc")]).unwrap();
        assert_eq!(config.groq_api_key, "gsk-abc");
        assert_eq!(config.tavily_api_key, None);
        assert!(!config.search_enabled());
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.search_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_empty_tavily_key_disables_search() {
        let config = config_from(&[("GROQ_API_KEY", "gsk-abc"), ("TAVILY_API_KEY", "  ")]).unwrap();
        assert!(!config.search_enabled());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("GROQ_API_KEY", "gsk-abc"),
            ("TAVILY_API_KEY", "tvly-123"),
            ("PORT", "3000"),
            ("STAGING_DIR", "/var/tmp/jobgenie"),
            ("MAX_UPLOAD_MB", "2"),
            ("SEARCH_INTERVAL_MS", "0"),
        ])
        .unwrap();
        assert!(config.search_enabled());
        assert_eq!(config.port, 3000);
        assert_eq!(config.staging_dir, PathBuf::from("/var/tmp/jobgenie"));
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
        assert_eq!(config.search_interval, Duration::ZERO);
    }

    #[test]
    fn test_oversized_upload_cap_is_rejected() {
        let huge = usize::MAX.to_string();
        let err = config_from(&[("GROQ_API_KEY", "gsk-abc"), ("MAX_UPLOAD_MB", huge.as_str())]).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_MB is too large"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("GROQ_API_KEY", "gsk-abc"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
