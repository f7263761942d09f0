// src/config.rs
// =============================================================================
// Runtime settings.
//
// Values come from the process environment, after loading a `.env` file from
// the working directory if one exists. Every setting has a default except the
// API key, which is only needed when the cache misses.
//
// Rust concepts:
// - Closures as parameters: `from_lookup` takes any `Fn(&str) -> Option<String>`
//   so tests can feed a HashMap instead of touching real env vars
// - Option combinators: and_then / unwrap_or for typed defaults
// =============================================================================

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{EditorialError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Settings {
    /// OpenAI API key (OPENAI_API_KEY)
    pub openai_api_key: Option<String>,
    /// Chat model name (OPENAI_MODEL)
    pub openai_model: String,
    /// API root, without trailing slash (OPENAI_BASE_URL)
    pub openai_base_url: String,
    /// Where cache records live (CACHE_DIR)
    pub cache_dir: PathBuf,
    /// Cache entry lifetime in hours (CACHE_TTL_HOURS)
    pub cache_ttl_hours: u64,
    /// How long to let JavaScript run before grabbing the page (JS_WAIT_TIME, ms)
    pub js_wait_ms: u64,
    /// Per-request timeout in seconds (HTTP_TIMEOUT)
    pub http_timeout_secs: u64,
    /// Attempts for transient network failures (HTTP_RETRIES)
    pub http_retries: u32,
    /// User-Agent header for plain requests and the browser (USER_AGENT)
    pub user_agent: String,
    /// Explicit Chromium binary (CHROME_PATH)
    pub chrome_path: Option<PathBuf>,
    /// Default log filter when RUST_LOG is unset (LOG_LEVEL)
    pub log_level: String,
}

impl Settings {
    // Loads `.env` (if present) and then reads the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Missing .env is fine
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Builds settings from an arbitrary key lookup
    //
    // Numeric values that fail to parse are reported instead of silently
    // replaced, so a typo in .env does not go unnoticed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat empty strings the same as unset
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let settings = Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            cache_dir: get("CACHE_DIR")
                .map(|raw| expand_home(&raw))
                .unwrap_or_else(default_cache_dir),
            cache_ttl_hours: parse_number(get("CACHE_TTL_HOURS"), "CACHE_TTL_HOURS", 168)?,
            js_wait_ms: parse_number(get("JS_WAIT_TIME"), "JS_WAIT_TIME", 5000)?,
            http_timeout_secs: parse_number(get("HTTP_TIMEOUT"), "HTTP_TIMEOUT", 30)?,
            http_retries: parse_number(get("HTTP_RETRIES"), "HTTP_RETRIES", 3)?,
            user_agent: get("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            chrome_path: get("CHROME_PATH").map(PathBuf::from),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_timeout_secs == 0 {
            return Err(EditorialError::Config("HTTP_TIMEOUT must be at least 1".into()));
        }
        if self.http_retries == 0 {
            return Err(EditorialError::Config("HTTP_RETRIES must be at least 1".into()));
        }
        if !self.openai_base_url.starts_with("http://") && !self.openai_base_url.starts_with("https://") {
            return Err(EditorialError::Config(format!(
                "OPENAI_BASE_URL must be an http(s) URL, got '{}'",
                self.openai_base_url
            )));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn js_wait(&self) -> Duration {
        Duration::from_millis(self.js_wait_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: default_cache_dir(),
            cache_ttl_hours: 168,
            js_wait_ms: 5000,
            http_timeout_secs: 30,
            http_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_path: None,
            log_level: "warn".to_string(),
        }
    }
}

// <platform cache dir>/codeforces-editorial, or ./.cache/codeforces-editorial
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("codeforces-editorial")
}

// "~" and "~/..." are relative to the home directory; shells do not expand
// them inside .env files
fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| EditorialError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = settings_from(&[]).unwrap();
        assert!(settings.openai_api_key.is_none());
        assert_eq!(settings.openai_model, DEFAULT_MODEL);
        assert_eq!(settings.cache_ttl_hours, 168);
        assert_eq!(settings.js_wait_ms, 5000);
        assert_eq!(settings.http_retries, 3);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.cache_dir.ends_with("codeforces-editorial"));
    }

    #[test]
    fn test_values_override_defaults() {
        let settings = settings_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("CACHE_DIR", "/tmp/cf"),
            ("CACHE_TTL_HOURS", "2"),
            ("JS_WAIT_TIME", "100"),
        ])
        .unwrap();

        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.openai_model, "gpt-test");
        assert_eq!(settings.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/cf"));
        assert_eq!(settings.cache_ttl_hours, 2);
        assert_eq!(settings.js_wait(), Duration::from_millis(100));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = settings_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(settings.openai_api_key.is_none());
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let err = settings_from(&[("CACHE_TTL_HOURS", "a week")]).unwrap_err();
        assert!(matches!(err, EditorialError::Config(_)));
        assert!(err.to_string().contains("CACHE_TTL_HOURS"));
    }

    #[test]
    fn test_cache_dir_tilde_is_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let settings = settings_from(&[("CACHE_DIR", "~/.cache/codeforces-editorial")]).unwrap();
        assert_eq!(settings.cache_dir, home.join(".cache/codeforces-editorial"));
        assert_eq!(expand_home("~"), home);
    }

    #[test]
    fn test_cache_dir_without_tilde_is_unchanged() {
        assert_eq!(expand_home("relative/cache"), PathBuf::from("relative/cache"));
        assert_eq!(expand_home("~other/cache"), PathBuf::from("~other/cache"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(settings_from(&[("HTTP_TIMEOUT", "0")]).is_err());
    }
}
