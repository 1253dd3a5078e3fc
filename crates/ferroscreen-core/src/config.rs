//! Client configuration resolved from defaults and environment variables.

use crate::CacheMode;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const ENV_BASE_URL: &str = "FERROSCREEN_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "FERROSCREEN_TIMEOUT_MS";

/// Where and how the dashboard client reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub cache_mode: CacheMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cache_mode: CacheMode::Use,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `FERROSCREEN_BASE_URL` and `FERROSCREEN_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
            config.base_url = base_url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => config.timeout_ms = timeout_ms,
                _ => tracing::warn!(
                    value = %raw,
                    default = DEFAULT_TIMEOUT_MS,
                    "ignoring invalid FERROSCREEN_TIMEOUT_MS"
                ),
            }
        }

        config.base_url = normalize_base_url(&config.base_url);
        config
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}
