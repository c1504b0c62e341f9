//! Configuration module for pivotgrid.
//!
//! Handles the TOML settings file and its defaults.

mod settings;

pub use settings::{DateFormats, ReactTableSettings, Settings, SettingsError, DEFAULT_SETTINGS};
