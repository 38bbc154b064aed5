//! Forecasting models for daily demand series
//!
//! A model is fitted once on a [`DemandSeries`], asked for the dates to
//! predict (every historical date plus a horizon of future days), and then
//! produces a point prediction with lower/upper bounds for each date. The
//! pipeline only relies on this contract; the statistics behind it belong to
//! the individual models.

use crate::error::{ForecastError, Result};
use crate::series::DemandSeries;
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt::{self, Debug};
use std::str::FromStr;

pub mod exponential_smoothing;
pub mod trend;

pub use exponential_smoothing::HoltSmoothing;
pub use trend::TrendSeasonal;

/// Smallest forecast horizon in days
pub const MIN_HORIZON: usize = 7;
/// Largest forecast horizon in days
pub const MAX_HORIZON: usize = 60;
/// Horizon used when none is given
pub const DEFAULT_HORIZON: usize = 30;
/// Default coverage of the prediction interval
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.8;

/// Number of future days to forecast, always within `[7, 60]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Horizon(usize);

impl Horizon {
    pub fn new(days: usize) -> Result<Self> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&days) {
            return Err(ForecastError::InvalidParameter(format!(
                "Horizon must be between {} and {} days, got {}",
                MIN_HORIZON, MAX_HORIZON, days
            )));
        }

        Ok(Self(days))
    }

    pub fn days(&self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(DEFAULT_HORIZON)
    }
}

/// Which built-in model to fit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Linear trend with day-of-week effects
    #[default]
    Trend,
    /// Holt double exponential smoothing
    Holt,
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trend" => Ok(ModelKind::Trend),
            "holt" => Ok(ModelKind::Holt),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown model '{}', expected 'trend' or 'holt'",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Trend => write!(f, "trend"),
            ModelKind::Holt => write!(f, "holt"),
        }
    }
}

/// Prediction for one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Predictions over the historical dates followed by the horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    rows: Vec<ForecastRow>,
    history_len: usize,
}

impl Forecast {
    /// Create a forecast whose first `history_len` rows cover observed dates
    pub fn new(rows: Vec<ForecastRow>, history_len: usize) -> Result<Self> {
        if history_len > rows.len() {
            return Err(ForecastError::ForecastingError(format!(
                "History length ({}) exceeds row count ({})",
                history_len,
                rows.len()
            )));
        }

        if rows.windows(2).any(|w| w[0].date >= w[1].date) {
            return Err(ForecastError::ForecastingError(
                "Forecast dates must be strictly increasing".to_string(),
            ));
        }

        Ok(Self { rows, history_len })
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Rows for observed dates
    pub fn history(&self) -> &[ForecastRow] {
        &self.rows[..self.history_len]
    }

    /// Rows past the last observed date
    pub fn future(&self) -> &[ForecastRow] {
        &self.rows[self.history_len..]
    }

    /// The last `n` rows (all rows if there are fewer)
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Observed dates the model was fitted on, ascending
    fn history_dates(&self) -> &[NaiveDate];

    /// Every historical date followed by `periods` consecutive days after the last one
    fn make_future_dates(&self, periods: usize) -> Result<Vec<NaiveDate>> {
        let history = self.history_dates();
        let mut dates = history.to_vec();
        if let Some(&last) = history.last() {
            dates.extend(future_dates(last, periods)?);
        }
        Ok(dates)
    }

    /// Predict every date in `dates`, which must be strictly increasing
    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a demand series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model on the observed series
    fn train(&self, series: &DemandSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Two-sided standard normal quantile for an interval covering `width`
pub fn interval_z(width: f64) -> Result<f64> {
    if !(width > 0.0 && width < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Interval width must be between 0 and 1, got {}",
            width
        )));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + width / 2.0))
}

/// Half-width of the band `steps_ahead` days past the last observation.
///
/// Uncertainty grows with the distance from the data, relative to how much
/// history (`n`) backs the fit.
pub(crate) fn band_half_width(z: f64, sigma: f64, steps_ahead: i64, n: usize) -> f64 {
    let steps = steps_ahead.max(0) as f64;
    z * sigma * (1.0 + steps / n.max(1) as f64).sqrt()
}

/// Ensure the series can be fitted at all
pub(crate) fn require_fit_data(series: &DemandSeries) -> Result<()> {
    if series.len() < 2 {
        return Err(ForecastError::InsufficientData(format!(
            "Need at least 2 distinct dates to fit a model, got {}",
            series.len()
        )));
    }

    Ok(())
}

/// Check that prediction dates are strictly increasing
pub(crate) fn require_increasing(dates: &[NaiveDate]) -> Result<()> {
    if dates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ForecastError::InvalidParameter(
            "Prediction dates must be strictly increasing".to_string(),
        ));
    }

    Ok(())
}
