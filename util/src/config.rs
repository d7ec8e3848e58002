//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Free functions such as [`openai_api_key`] read a single field from the
//! singleton and return an owned copy, so callers never hold the lock.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub ai_model: String,
    pub ai_max_tokens: u32,
    pub ai_request_timeout_secs: u64,
    pub bulk_grading_delay_ms: u64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every value has a default; malformed numbers fall back to it as well.
    /// A missing `OPENAI_API_KEY` is only reported when an AI call is made.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            log_level: var_or("LOG_LEVEL", "marker=info"),
            log_file: var_or("LOG_FILE", "marker.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            ai_model: var_or("AI_MODEL", "gpt-4o"),
            ai_max_tokens: parsed_or("AI_MAX_TOKENS", 1500),
            ai_request_timeout_secs: parsed_or("AI_REQUEST_TIMEOUT_SECS", 120),
            bulk_grading_delay_ms: parsed_or("BULK_GRADING_DELAY_MS", 1000),
        }
    }

    fn instance() -> &'static RwLock<AppConfig> {
        CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()))
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// A poisoned lock still yields the last written configuration.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        Self::instance()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap_or_else(|p| p.into_inner());
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = Self::instance()
            .write()
            .unwrap_or_else(|p| p.into_inner());
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_openai_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.openai_api_key = value.into());
    }

    pub fn set_openai_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.openai_base_url = value.into());
    }

    pub fn set_ai_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.ai_model = value.into());
    }

    pub fn set_ai_max_tokens(value: u32) {
        AppConfig::set_field(|cfg| cfg.ai_max_tokens = value);
    }

    pub fn set_bulk_grading_delay_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.bulk_grading_delay_ms = value);
    }
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn openai_api_key() -> String {
    AppConfig::global().openai_api_key.clone()
}

pub fn openai_base_url() -> String {
    AppConfig::global().openai_base_url.clone()
}

pub fn ai_model() -> String {
    AppConfig::global().ai_model.clone()
}

pub fn ai_max_tokens() -> u32 {
    AppConfig::global().ai_max_tokens
}

pub fn ai_request_timeout_secs() -> u64 {
    AppConfig::global().ai_request_timeout_secs
}

pub fn bulk_grading_delay_ms() -> u64 {
    AppConfig::global().bulk_grading_delay_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        unsafe {
            env::remove_var("AI_MODEL");
            env::remove_var("AI_MAX_TOKENS");
            env::remove_var("BULK_GRADING_DELAY_MS");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.ai_model, "gpt-4o");
        assert_eq!(cfg.ai_max_tokens, 1500);
        assert_eq!(cfg.bulk_grading_delay_ms, 1000);
    }

    #[test]
    #[serial]
    fn test_malformed_number_falls_back_to_default() {
        unsafe {
            env::set_var("AI_MAX_TOKENS", "lots");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.ai_max_tokens, 1500);
        unsafe {
            env::remove_var("AI_MAX_TOKENS");
        }
    }

    #[test]
    #[serial]
    fn test_setter_overrides_and_reset_restores() {
        unsafe {
            env::remove_var("AI_MODEL");
        }
        AppConfig::set_ai_model("gpt-4o-mini");
        assert_eq!(ai_model(), "gpt-4o-mini");

        AppConfig::reset();
        assert_eq!(ai_model(), "gpt-4o");
    }
}
