use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; anything not set falls back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardSettings,
    pub data: DataSettings,
    pub logging: LoggingSettings,
}

/// Parameters that shape the metrics and the rendered dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// The account balance before the first trade.
    pub starting_balance: Decimal,
    /// Number of samples in the smoothed balance curve.
    pub smoothing_points: usize,
    /// Number of bars in the trade-duration histogram.
    pub histogram_bins: usize,
    pub currency_symbol: String,
}

/// Where the trade export lives and how its timestamps are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub path: Option<PathBuf>,
    /// A `chrono` format string, e.g. `%d/%m/%Y %H:%M`.
    pub timestamp_format: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            starting_balance: dec!(25000),
            smoothing_points: 10_000,
            histogram_bins: 30,
            currency_symbol: "£".to_string(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: None,
            timestamp_format: "%d/%m/%Y %H:%M".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Rejects settings the dashboard cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.starting_balance <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "dashboard.starting_balance must be positive, got {}",
                self.dashboard.starting_balance
            )));
        }
        if self.dashboard.smoothing_points < 2 {
            return Err(ConfigError::ValidationError(
                "dashboard.smoothing_points must be at least 2".to_string(),
            ));
        }
        if self.dashboard.histogram_bins == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.data.timestamp_format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.timestamp_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
