//! Holt double exponential smoothing for demand series

use crate::error::{ForecastError, Result};
use crate::models::{
    band_half_width, interval_z, require_fit_data, require_increasing, Forecast, ForecastModel,
    ForecastRow, TrainedForecastModel, DEFAULT_INTERVAL_WIDTH,
};
use crate::series::DemandSeries;
use chrono::NaiveDate;
use demand_math::stats::sample_std_dev;
use demand_math::DoubleExponentialSmoothing;
use std::collections::BTreeMap;
use tracing::debug;

/// Holt's linear method: a smoothed level plus a smoothed trend
#[derive(Debug, Clone)]
pub struct HoltSmoothing {
    /// Name of the model
    name: String,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Coverage of the prediction interval
    interval_width: f64,
}

/// Trained Holt model
#[derive(Debug, Clone)]
pub struct TrainedHoltSmoothing {
    name: String,
    level: f64,
    trend: f64,
    /// One-step-ahead fitted value per observed date
    fitted: BTreeMap<NaiveDate, f64>,
    /// Mean calendar days between consecutive observations
    mean_spacing: f64,
    z: f64,
    sigma: f64,
    last_date: NaiveDate,
    history: Vec<NaiveDate>,
}

impl HoltSmoothing {
    /// Create a new Holt model
    pub fn new(alpha: f64, beta: f64, interval_width: f64) -> Result<Self> {
        // Validates alpha and beta
        DoubleExponentialSmoothing::new(alpha, beta)?;
        interval_z(interval_width)?;

        Ok(Self {
            name: format!("Holt Smoothing (alpha={}, beta={})", alpha, beta),
            alpha,
            beta,
            interval_width,
        })
    }

    /// Create a Holt model with the default interval width
    pub fn with_params(alpha: f64, beta: f64) -> Result<Self> {
        Self::new(alpha, beta, DEFAULT_INTERVAL_WIDTH)
    }
}

impl ForecastModel for HoltSmoothing {
    type Trained = TrainedHoltSmoothing;

    fn train(&self, series: &DemandSeries) -> Result<Self::Trained> {
        require_fit_data(series)?;

        let mut smoother = DoubleExponentialSmoothing::new(self.alpha, self.beta)?;
        let mut fitted = BTreeMap::new();
        let mut residuals = Vec::with_capacity(series.len());

        for point in series.points() {
            // Before the first update there is nothing to predict from
            let prediction = match smoother.forecast(1) {
                Ok(value) => {
                    residuals.push(point.total_demand - value);
                    value
                }
                Err(_) => point.total_demand,
            };
            fitted.insert(point.date, prediction);
            smoother.update(point.total_demand)?;
        }

        let sigma = if residuals.len() >= 2 {
            sample_std_dev(&residuals)?
        } else {
            0.0
        };

        let last_date = series.last_date().ok_or_else(|| {
            ForecastError::InsufficientData("Empty demand series".to_string())
        })?;
        // Dates are distinct, so at least one day per step
        let mean_spacing = (series.span_days() - 1) as f64 / (series.len() - 1) as f64;

        debug!(
            alpha = self.alpha,
            beta = self.beta,
            level = smoother.level()?,
            trend = smoother.trend()?,
            mean_spacing,
            sigma,
            "fitted Holt model"
        );

        Ok(TrainedHoltSmoothing {
            name: self.name.clone(),
            level: smoother.level()?,
            trend: smoother.trend()?,
            fitted,
            mean_spacing,
            z: interval_z(self.interval_width)?,
            sigma,
            last_date,
            history: series.dates(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltSmoothing {
    /// Final smoothed level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Final smoothed trend, per observation step
    pub fn trend(&self) -> f64 {
        self.trend
    }

    fn point_estimate(&self, date: NaiveDate) -> f64 {
        // The trend is learned per observation; convert days into observation steps
        if date > self.last_date {
            let steps = (date - self.last_date).num_days() as f64 / self.mean_spacing;
            return self.level + steps * self.trend;
        }

        // Dates inside the history without orders carry the previous fit
        self.fitted
            .range(..=date)
            .next_back()
            .or_else(|| self.fitted.iter().next())
            .map(|(_, &value)| value)
            .unwrap_or(self.level)
    }
}

impl TrainedForecastModel for TrainedHoltSmoothing {
    fn history_dates(&self) -> &[NaiveDate] {
        &self.history
    }

    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast> {
        require_increasing(dates)?;

        let n = self.history.len();
        let rows = dates
            .iter()
            .map(|&date| {
                let predicted = self.point_estimate(date);
                let half = band_half_width(self.z, self.sigma, (date - self.last_date).num_days(), n);
                ForecastRow {
                    date,
                    predicted,
                    lower: predicted - half,
                    upper: predicted + half,
                }
            })
            .collect();

        let history_len = dates.iter().filter(|&&d| d <= self.last_date).count();
        Forecast::new(rows, history_len)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
