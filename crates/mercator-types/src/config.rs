//! Console configuration loaded from `mercator.toml`.
//!
//! Every field has a default so an absent or partial file is valid.
//! Credentials are never read from the file; they come from the process
//! environment when a scope is constructed.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MercatorError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MERCATOR_CONFIG";

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mercator.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MercatorConfig {
    /// Prefix of the root scope, shown first in the prompt.
    pub title: String,
    /// Print the ASCII banner at startup.
    pub banner: bool,
    pub binance: BinanceConfig,
    pub shopify: ShopifyConfig,
}

impl Default for MercatorConfig {
    fn default() -> Self {
        Self {
            title: "mercator".to_string(),
            banner: true,
            binance: BinanceConfig::default(),
            shopify: ShopifyConfig::default(),
        }
    }
}

/// Settings for the Binance exchange scope.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    /// REST endpoint root.
    pub base_url: String,
    /// `recvWindow` sent with signed requests, in milliseconds.
    pub recv_window_ms: u64,
    /// Order book levels fetched by `depth`.
    pub depth_limit: u16,
    /// Default row count for the trade listing commands.
    pub trade_limit: u16,
    /// Proxy URL; falls back to `HTTPS_PROXY` when unset.
    pub proxy_url: Option<String>,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            recv_window_ms: 5000,
            depth_limit: 10,
            trade_limit: 50,
            proxy_url: None,
            timeout_secs: 30,
        }
    }
}

/// Storefront projection assumptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopifyConfig {
    /// Advertising cost per thousand impressions.
    pub cpm: f64,
    /// Ad click-through rate (fraction).
    pub ctr: f64,
    /// Visitor to purchase conversion rate (fraction).
    pub conversion: f64,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            cpm: 6.2,
            ctr: 0.0259,
            conversion: 0.03,
        }
    }
}

impl MercatorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Resolve the configuration for this process.
    ///
    /// Order: `$MERCATOR_CONFIG` (must exist), then `./mercator.toml` if
    /// present, then built-in defaults.
    pub fn load() -> Result<Self> {
        match Self::locate(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(&path)
            },
            None => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            },
        }
    }

    fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
        if explicit.is_some() {
            return explicit;
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.title.contains(char::is_whitespace) {
            return Err(MercatorError::Config(format!(
                "title must be a single non-empty word, got {:?}",
                self.title
            )));
        }
        let s = &self.shopify;
        if s.ctr <= 0.0 || s.conversion <= 0.0 {
            return Err(MercatorError::Config(
                "shopify ctr and conversion must be greater than 0".to_string(),
            ));
        }
        if self.binance.depth_limit == 0 {
            return Err(MercatorError::Config(
                "binance depth_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
