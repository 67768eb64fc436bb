//! Dashboard configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional `airline-dash.{toml,json,yaml}` file in the working directory
//! 3. environment variables with the `AIRLINE_DASH` prefix and `__`
//!    separator, e.g. `AIRLINE_DASH__DATASET_PATH=data/reviews.parquet`
//! 4. the dataset path given as the first command-line argument

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_DATASET: &str = "data/airDataFiltered.csv";
pub const DEFAULT_HEADER: &str = "TOP 10 Airlines - Customer Ratings";
const CONFIG_FILE: &str = "airline-dash";
const ENV_PREFIX: &str = "AIRLINE_DASH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings of the dashboard window and its data source.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// Review file (`.csv`, `.json` or `.parquet`).
    pub dataset_path: PathBuf,
    /// Heading shown above the charts; also the window title.
    pub header: String,
    pub window_width: f32,
    pub window_height: f32,
    pub min_window_width: f32,
    pub min_window_height: f32,
}

impl DashboardConfig {
    /// Load using the process arguments for the dataset override.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(std::env::args().nth(1))
    }

    /// Load, with `dataset_override` taking precedence over every other
    /// source.
    pub fn load_with(dataset_override: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("dataset_path", DEFAULT_DATASET)?
            .set_default("header", DEFAULT_HEADER)?
            .set_default("window_width", 1400.0)?
            .set_default("window_height", 800.0)?
            .set_default("min_window_width", 800.0)?
            .set_default("min_window_height", 500.0)?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::default().prefix(ENV_PREFIX).separator("__"));

        if let Some(path) = dataset_override {
            builder = builder.set_override("dataset_path", path)?;
        }

        let config: DashboardConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("dataset_path is empty".to_string()));
        }
        let sizes = [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("min_window_width", self.min_window_width),
            ("min_window_height", self.min_window_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_overrides_dataset_path() {
        let config = DashboardConfig::load_with(Some("reviews.parquet".into())).expect("config");
        assert_eq!(config.dataset_path, PathBuf::from("reviews.parquet"));
        assert!(config.window_width > 0.0);
    }

    #[test]
    fn rejects_non_positive_window_sizes() {
        let mut config = DashboardConfig::load_with(Some("x.csv".into())).expect("config");
        config.min_window_height = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_dataset_path() {
        let err = DashboardConfig::load_with(Some(String::new())).expect_err("empty path");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
