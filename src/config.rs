//! Configuration for the insight agent
//!
//! Loaded once at startup and passed into constructors. Two sources:
//! 1. Environment variables (highest priority, API keys live here only)
//! 2. JSON config file via `--config` - everything except secrets
//!
//! # Examples
//!
//! ```bash
//! export SOLANA_TRACKER_API_KEY="YOUR_KEY"
//! # optional overrides
//! export SOLANA_TRACKER_BASE_URL="https://data.solanatracker.io"
//! export LLM_API_URL="https://api.openai.com/v1"
//! export LLM_API_KEY="YOUR_KEY"
//! export LLM_MODEL="gpt-4o-mini"
//! ```

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable names
mod env_vars {
    pub const SOLANA_TRACKER_API_KEY: &str = "SOLANA_TRACKER_API_KEY";
    pub const SOLANA_TRACKER_BASE_URL: &str = "SOLANA_TRACKER_BASE_URL";
    pub const DEXSCREENER_BASE_URL: &str = "DEXSCREENER_BASE_URL";
    pub const LLM_API_URL: &str = "LLM_API_URL";
    pub const LLM_API_KEY: &str = "LLM_API_KEY";
    pub const LLM_MODEL: &str = "LLM_MODEL";
}

/// Built-in defaults
mod defaults {
    pub const TRACKER_BASE_URL: &str = "https://data.solanatracker.io";
    pub const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com";
    pub const LLM_API_URL: &str = "https://api.openai.com/v1";
    pub const LLM_MODEL: &str = "gpt-4o-mini";
    pub const PNL_WINDOW: &str = "7d";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const TRADE_DISPLAY_LIMIT: usize = 10;
}

/// Solana Tracker data API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub base_url: String,
    /// Sourced from the environment only, never from config files
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::TRACKER_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// DexScreener public API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DexScreenerConfig {
    pub base_url: String,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEXSCREENER_BASE_URL.to_string(),
        }
    }
}

/// Language model endpoint settings (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    /// Sourced from the environment only, never from config files
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::LLM_API_URL.to_string(),
            model: defaults::LLM_MODEL.to_string(),
            api_key: None,
        }
    }
}

/// Wallet/token analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Historic PnL window requested for wallet analysis ("1d", "7d", "30d")
    pub pnl_window: String,
    /// How many recent trades to include in rendered reports
    pub trade_display_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pnl_window: defaults::PNL_WINDOW.to_string(),
            trade_display_limit: defaults::TRADE_DISPLAY_LIMIT,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub dexscreener: DexScreenerConfig,
    pub llm: LlmConfig,
    pub analysis: AnalysisConfig,
    /// Applied to every outbound HTTP request
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            dexscreener: DexScreenerConfig::default(),
            llm: LlmConfig::default(),
            analysis: AnalysisConfig::default(),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Build configuration from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = std::env::var(env_vars::SOLANA_TRACKER_BASE_URL) {
            tracing::debug!("Using SOLANA_TRACKER_BASE_URL override");
            config.tracker.base_url = url;
        }
        if let Ok(url) = std::env::var(env_vars::DEXSCREENER_BASE_URL) {
            tracing::debug!("Using DEXSCREENER_BASE_URL override");
            config.dexscreener.base_url = url;
        }
        if let Ok(url) = std::env::var(env_vars::LLM_API_URL) {
            config.llm.api_url = url;
        }
        if let Ok(model) = std::env::var(env_vars::LLM_MODEL) {
            config.llm.model = model;
        }
        config.load_keys_from_env();

        config
    }

    /// Load a JSON config file, then pick up API keys from the environment.
    /// File values win over defaults; secrets are never read from files.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let mut config: Config = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.load_keys_from_env();
        Ok(config)
    }

    fn load_keys_from_env(&mut self) {
        if let Ok(key) = std::env::var(env_vars::SOLANA_TRACKER_API_KEY) {
            self.tracker.api_key = Some(SecretString::from(key));
        }
        if let Ok(key) = std::env::var(env_vars::LLM_API_KEY) {
            self.llm.api_key = Some(SecretString::from(key));
        }
    }

    /// Whether the Solana Tracker API is usable (a key is configured).
    pub fn has_tracker_key(&self) -> bool {
        self.tracker.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_cascade() {
        // Env mutation is process-global, so the whole cascade lives in one test.
        std::env::remove_var(env_vars::SOLANA_TRACKER_BASE_URL);
        std::env::remove_var(env_vars::SOLANA_TRACKER_API_KEY);

        let config = Config::from_env();
        assert_eq!(config.tracker.base_url, defaults::TRACKER_BASE_URL);
        assert!(!config.has_tracker_key());

        std::env::set_var(env_vars::SOLANA_TRACKER_BASE_URL, "https://example.test");
        std::env::set_var(env_vars::SOLANA_TRACKER_API_KEY, "k-123");

        let config = Config::from_env();
        assert_eq!(config.tracker.base_url, "https://example.test");
        assert!(config.has_tracker_key());

        std::env::remove_var(env_vars::SOLANA_TRACKER_BASE_URL);
        std::env::remove_var(env_vars::SOLANA_TRACKER_API_KEY);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.pnl_window, "7d");
        assert_eq!(config.analysis.trade_display_limit, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.llm.api_url, defaults::LLM_API_URL);
    }

    #[test]
    fn test_from_file_partial_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"analysis": {{"pnl_window": "30d"}}, "request_timeout_secs": 5}}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.analysis.pnl_window, "30d");
        assert_eq!(config.request_timeout_secs, 5);
        // untouched sections keep their defaults
        assert_eq!(config.tracker.base_url, defaults::TRACKER_BASE_URL);
        assert_eq!(config.analysis.trade_display_limit, 10);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/insight.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
