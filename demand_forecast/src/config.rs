//! Layered run configuration
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. An optional TOML/YAML/JSON file
//! 3. Environment variables (`DEMAND__*`)
//!
//! Command-line flags are applied on top by the binary.

use crate::error::{ForecastError, Result};
use crate::models::{
    interval_z, Horizon, ModelKind, DEFAULT_HORIZON, DEFAULT_INTERVAL_WIDTH, MAX_HORIZON,
    MIN_HORIZON,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "DEMAND";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_HOLT_ALPHA: f64 = 0.5;
const DEFAULT_HOLT_BETA: f64 = 0.3;

/// Settings for one forecasting run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Forecast horizon in days, 7 to 60
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Coverage of the prediction interval, strictly between 0 and 1
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,

    /// Model to fit
    #[serde(default)]
    pub model: ModelKind,

    /// Holt level smoothing
    #[serde(default = "default_holt_alpha")]
    pub holt_alpha: f64,

    /// Holt trend smoothing
    #[serde(default = "default_holt_beta")]
    pub holt_beta: f64,

    /// Default tracing filter level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format
    #[serde(default)]
    pub log_json: bool,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

fn default_interval_width() -> f64 {
    DEFAULT_INTERVAL_WIDTH
}

fn default_holt_alpha() -> f64 {
    DEFAULT_HOLT_ALPHA
}

fn default_holt_beta() -> f64 {
    DEFAULT_HOLT_BETA
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            interval_width: default_interval_width(),
            model: ModelKind::default(),
            holt_alpha: default_holt_alpha(),
            holt_beta: default_holt_beta(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ForecastConfig {
    /// Load defaults, then `file` if given, then `DEMAND__*` variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("horizon", DEFAULT_HORIZON as i64)?
            .set_default("interval_width", DEFAULT_INTERVAL_WIDTH)?
            .set_default("model", ModelKind::default().to_string())?
            .set_default("holt_alpha", DEFAULT_HOLT_ALPHA)?
            .set_default("holt_beta", DEFAULT_HOLT_BETA)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("log_json", false)?;

        if let Some(path) = file {
            debug!(path = %path.display(), "reading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let forecast_config: ForecastConfig = config.try_deserialize()?;
        forecast_config.validate()?;

        info!(
            horizon = forecast_config.horizon,
            model = %forecast_config.model,
            interval_width = forecast_config.interval_width,
            "configuration loaded"
        );
        Ok(forecast_config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&self.horizon) {
            return Err(ForecastError::InvalidParameter(format!(
                "horizon must be between {} and {}, got {}",
                MIN_HORIZON, MAX_HORIZON, self.horizon
            )));
        }

        interval_z(self.interval_width)?;

        for (name, value) in [("holt_alpha", self.holt_alpha), ("holt_beta", self.holt_beta)] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// The configured horizon
    pub fn horizon(&self) -> Result<Horizon> {
        Horizon::new(self.horizon)
    }
}
