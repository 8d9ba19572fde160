//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use pharma_commerce::money::Currency;
use pharma_store::CART_STORAGE_KEY;
use pharma_sync::{BackoffStrategy, RetryPolicy};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Client storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Query retry configuration.
    #[serde(default)]
    pub sync: SyncConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Currency used to render prices. Unknown codes fall back to NPR.
    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.display.currency).unwrap_or_default()
    }

    /// Retry policy for queries, from the `[sync]` section.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.sync.max_retries).with_backoff(BackoffStrategy::Exponential {
            base: Duration::from_millis(self.sync.retry_base_ms),
            max: Duration::from_millis(self.sync.retry_max_ms),
        })
    }
}

/// Where the cart lives on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Key the cart is persisted under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_storage_dir() -> String {
    ".pharma".to_string()
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// ISO currency code for prices.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "NPR".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Retry settings applied to queries that allow retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Retries after the first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    /// Backoff ceiling in milliseconds.
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    50
}

fn default_retry_max_ms() -> u64 {
    1000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
        }
    }
}

/// Generate a default pharma.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Hitech Pharma client configuration

[storage]
dir = "{dir}"
cart_key = "{cart_key}"

[display]
currency = "{currency}"

[sync]
max_retries = {max_retries}
retry_base_ms = {retry_base_ms}
retry_max_ms = {retry_max_ms}
"#,
        dir = default_storage_dir(),
        cart_key = default_cart_key(),
        currency = default_currency(),
        max_retries = default_max_retries(),
        retry_base_ms = default_retry_base_ms(),
        retry_max_ms = default_retry_max_ms(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let parsed: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(parsed, CliConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: CliConfig = toml::from_str("[display]\ncurrency = \"inr\"\n").unwrap();
        assert_eq!(parsed.currency(), Currency::INR);
        assert_eq!(parsed.storage.cart_key, CART_STORAGE_KEY);
        assert_eq!(parsed.sync.max_retries, 3);
    }

    #[test]
    fn test_unknown_currency_falls_back() {
        let mut config = CliConfig::default();
        config.display.currency = "XYZ".into();
        assert_eq!(config.currency(), Currency::NPR);
    }

    #[test]
    fn test_retry_policy_from_sync_section() {
        let mut config = CliConfig::default();
        config.sync.max_retries = 5;
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pharma.json");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.storage.dir = "/var/lib/pharma".into();
        config.save(path).unwrap();

        assert_eq!(CliConfig::load(path).unwrap(), config);
    }
}
