//! TOML-based configuration for pivotgrid.
//!
//! Example configuration:
//! ```toml
//! [react_table]
//! totals_label = "Total"
//! totals_class_name = "totals-marker"
//! missing_value = "NaN"
//! infinite_value = "Inf"
//! collapse_single_metric = false
//! max_columns = 50
//!
//! [react_table.date_formats]
//! daily = "%d/%m/%Y"
//! quarterly = "%Y Q%q"
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Interval;

/// Settings used when nothing else is configured.
pub static DEFAULT_SETTINGS: Lazy<Settings> = Lazy::new(Settings::default);

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// React table widget settings.
    pub react_table: ReactTableSettings,
}

/// Settings for the react table widget.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReactTableSettings {
    /// Header and display label of totals rows and columns.
    pub totals_label: String,

    /// CSS class attached to totals headers.
    pub totals_class_name: String,

    /// Replacement for missing cell values.
    pub missing_value: String,

    /// Replacement for infinite cell values.
    pub infinite_value: String,

    /// Display value used when a display field is missing.
    pub missing_display_value: String,

    /// Drop the metrics level from pivoted columns when it holds one metric.
    pub collapse_single_metric: bool,

    /// Keep only the first N columns after pivoting.
    pub max_columns: Option<usize>,

    /// Date format per interval.
    pub date_formats: DateFormats,
}

impl Default for ReactTableSettings {
    fn default() -> Self {
        Self {
            totals_label: "Totals".to_string(),
            totals_class_name: "totals-marker".to_string(),
            missing_value: "NaN".to_string(),
            infinite_value: "Inf".to_string(),
            missing_display_value: "null".to_string(),
            collapse_single_metric: false,
            max_columns: None,
            date_formats: DateFormats::default(),
        }
    }
}

/// chrono format strings per interval. `%q` expands to the quarter (1-4).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DateFormats {
    pub hourly: String,
    pub daily: String,
    pub weekly: String,
    pub monthly: String,
    pub quarterly: String,
    pub annually: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            hourly: "%Y-%m-%d %H:00".to_string(),
            daily: "%Y-%m-%d".to_string(),
            weekly: "%Y-%m-%d".to_string(),
            monthly: "%Y-%m".to_string(),
            quarterly: "%Y-Q%q".to_string(),
            annually: "%Y".to_string(),
        }
    }
}

impl DateFormats {
    /// Format for `interval`; unknown intervals use the daily format.
    pub fn for_interval(&self, interval: Interval) -> &str {
        match interval {
            Interval::Hourly => &self.hourly,
            Interval::Daily | Interval::Other => &self.daily,
            Interval::Weekly => &self.weekly,
            Interval::Monthly => &self.monthly,
            Interval::Quarterly => &self.quarterly,
            Interval::Annually => &self.annually,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `PIVOTGRID_CONFIG`
    /// 2. `./pivotgrid.toml`
    /// 3. `~/.config/pivotgrid/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("PIVOTGRID_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("pivotgrid.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("pivotgrid").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let rt = &self.react_table;
        if rt.totals_label.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "react_table.totals_label must not be empty".to_string(),
            ));
        }
        if rt.max_columns == Some(0) {
            return Err(SettingsError::InvalidConfig(
                "react_table.max_columns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
