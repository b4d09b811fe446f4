//! # Checkout Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_PRODUCTS_PATH=/srv/till/products.md                           │
//! │     TILL_TODAY=2024-11-15                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $TILL_CONFIG, or                                                   │
//! │     ~/.config/till/checkout.toml (Linux)                               │
//! │     ~/Library/Application Support/com.till.checkout/checkout.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     data/products.md, data/promotions.md, 30% up to 8,000             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [data]
//! products_path = "data/products.md"
//! promotions_path = "data/promotions.md"
//!
//! [membership]
//! rate_bps = 3000   # 30%
//! cap = 8000
//!
//! [session]
//! today = "2024-11-15"     # optional, defaults to the local date
//! receipt_format = "text"  # text | json
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use till_core::types::DiscountRate;
use till_core::{MembershipPolicy, Money, DEFAULT_MEMBERSHIP_CAP, DEFAULT_MEMBERSHIP_RATE_BPS};
use till_store::SnapshotConfig;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Receipt Format
// =============================================================================

/// How the receipt is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptFormat {
    /// Aligned columns for a person at the counter.
    #[default]
    Text,

    /// Pretty-printed JSON for other tools.
    Json,
}

impl std::fmt::Display for ReceiptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptFormat::Text => write!(f, "text"),
            ReceiptFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReceiptFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReceiptFormat::Text),
            "json" => Ok(ReceiptFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "Unknown receipt format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Snapshot file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_products_path")]
    pub products_path: PathBuf,

    #[serde(default = "default_promotions_path")]
    pub promotions_path: PathBuf,
}

fn default_products_path() -> PathBuf {
    PathBuf::from("data/products.md")
}

fn default_promotions_path() -> PathBuf {
    PathBuf::from("data/promotions.md")
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            products_path: default_products_path(),
            promotions_path: default_promotions_path(),
        }
    }
}

/// Membership discount terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSettings {
    /// Discount rate in basis points.
    #[serde(default = "default_rate_bps")]
    pub rate_bps: u32,

    /// Maximum discount per purchase.
    #[serde(default = "default_cap")]
    pub cap: i64,
}

fn default_rate_bps() -> u32 {
    DEFAULT_MEMBERSHIP_RATE_BPS
}

fn default_cap() -> i64 {
    DEFAULT_MEMBERSHIP_CAP
}

impl Default for MembershipSettings {
    fn default() -> Self {
        MembershipSettings {
            rate_bps: default_rate_bps(),
            cap: default_cap(),
        }
    }
}

/// Per-session behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Business date used for promotion windows; the local date when unset.
    #[serde(default)]
    pub today: Option<NaiveDate>,

    #[serde(default)]
    pub receipt_format: ReceiptFormat,
}

// =============================================================================
// Checkout Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub data: DataSettings,

    #[serde(default)]
    pub membership: MembershipSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$TILL_CONFIG`, else the platform path)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("TILL_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data.products_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("products_path must not be empty".into()));
        }
        if self.data.promotions_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("promotions_path must not be empty".into()));
        }
        if self.membership.rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "membership rate_bps must be at most 10000, got {}",
                self.membership.rate_bps
            )));
        }
        if self.membership.cap < 0 {
            return Err(ConfigError::Invalid(format!(
                "membership cap must not be negative, got {}",
                self.membership.cap
            )));
        }
        Ok(())
    }

    /// Applies `TILL_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("TILL_PRODUCTS_PATH") {
            debug!(path = %path, "Overriding products path from environment");
            self.data.products_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("TILL_PROMOTIONS_PATH") {
            debug!(path = %path, "Overriding promotions path from environment");
            self.data.promotions_path = PathBuf::from(path);
        }

        if let Some(today) = lookup("TILL_TODAY") {
            match NaiveDate::parse_from_str(&today, "%Y-%m-%d") {
                Ok(date) => self.session.today = Some(date),
                Err(_) => warn!(today = %today, "Ignoring TILL_TODAY, expected YYYY-MM-DD"),
            }
        }

        if let Some(cap) = lookup("TILL_MEMBERSHIP_CAP") {
            match cap.parse::<i64>() {
                Ok(c) => self.membership.cap = c,
                Err(_) => warn!(cap = %cap, "Ignoring TILL_MEMBERSHIP_CAP, expected an integer"),
            }
        }

        if let Some(format) = lookup("TILL_RECEIPT_FORMAT") {
            match format.parse() {
                Ok(f) => self.session.receipt_format = f,
                Err(e) => warn!(error = %e, "Ignoring TILL_RECEIPT_FORMAT"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "checkout")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Snapshot locations for the store.
    pub fn snapshot_config(&self) -> SnapshotConfig {
        SnapshotConfig::new(
            self.data.products_path.clone(),
            self.data.promotions_path.clone(),
        )
    }

    /// Membership terms for receipts.
    pub fn membership_policy(&self) -> MembershipPolicy {
        MembershipPolicy {
            rate: DiscountRate::from_bps(self.membership.rate_bps),
            cap: Money::from_units(self.membership.cap),
        }
    }

    /// Business date: the configured override or the local date.
    pub fn today(&self) -> NaiveDate {
        self.session
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
