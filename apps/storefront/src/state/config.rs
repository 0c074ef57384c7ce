//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_STORE_NAME, STOREFRONT_DATABASE_PATH, ...               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/ (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! store_name = "Demo Store"
//! currency_symbol = "$"
//! currency_decimals = 2
//! database_path = "/var/lib/storefront/storefront.db"
//! login_timeout_ms = 5000
//! log_filter = "info,storefront=debug,sqlx=warn"
//! ```
//!
//! Read-only after startup, so no mutex.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,storefront=debug,sqlx=warn";

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Config State
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, rename = "StorefrontConfig")]
pub struct ConfigState {
    /// Store name shown in page headers.
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Database file. `None` means `storefront.db` in the platform data dir.
    #[ts(as = "Option<String>")]
    pub database_path: Option<PathBuf>,

    /// How long a login may wait for the credential verifier.
    pub login_timeout_ms: u64,

    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Storefront".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            database_path: None,
            login_timeout_ms: 5_000,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ConfigState {
    /// Loads configuration: defaults, then the TOML file, then `STOREFRONT_*`
    /// environment variables, then validation.
    ///
    /// ## Arguments
    /// * `config_path` - Explicit file; `None` uses the platform config dir.
    ///   A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with a custom environment lookup.
    pub fn load_with<F>(config_path: Option<PathBuf>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Like [`load`](Self::load) but falls back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(?path, "Config saved");
        Ok(())
    }

    /// Checks invariants the rest of the app relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.login_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "login_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.currency_decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most 4, got {}",
                self.currency_decimals
            )));
        }
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".to_string()));
        }
        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = env("STOREFRONT_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = env("STOREFRONT_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(path) = env("STOREFRONT_DATABASE_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = env("STOREFRONT_LOGIN_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => self.login_timeout_ms = ms,
                Err(_) => warn!(value = %raw, "Ignoring invalid STOREFRONT_LOGIN_TIMEOUT_MS"),
            }
        }

        if let Some(filter) = env("STOREFRONT_LOG") {
            self.log_filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The login timeout as a `Duration`.
    pub fn login_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.login_timeout_ms)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ```rust,ignore
    /// assert_eq!(ConfigState::default().format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency_decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                frac,
                width = self.currency_decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        }
    }
}
