//! Linear trend with additive day-of-week effects

use crate::error::Result;
use crate::models::{
    band_half_width, interval_z, require_fit_data, require_increasing, Forecast, ForecastModel,
    ForecastRow, TrainedForecastModel, DEFAULT_INTERVAL_WIDTH,
};
use crate::series::DemandSeries;
use chrono::{Datelike, NaiveDate};
use demand_math::stats::{mean, sample_std_dev};
use demand_math::{LinearRegression, TrendLine};
use tracing::debug;

/// History must span at least two weeks before weekday effects are fitted
pub const WEEKLY_MIN_SPAN_DAYS: i64 = 14;

/// Trend-plus-weekly-seasonality model
#[derive(Debug, Clone)]
pub struct TrendSeasonal {
    /// Name of the model
    name: String,
    /// Coverage of the prediction interval
    interval_width: f64,
}

/// Fitted trend-plus-weekly-seasonality model
#[derive(Debug, Clone)]
pub struct TrainedTrendSeasonal {
    name: String,
    line: TrendLine,
    r_squared: Option<f64>,
    /// Additive effect per weekday, Monday first
    weekday_effects: Option<[f64; 7]>,
    z: f64,
    sigma: f64,
    first_date: NaiveDate,
    last_date: NaiveDate,
    history: Vec<NaiveDate>,
}

impl TrendSeasonal {
    /// Create a model with the given prediction interval width
    pub fn new(interval_width: f64) -> Result<Self> {
        interval_z(interval_width)?;

        Ok(Self {
            name: "Trend + Weekly Seasonality".to_string(),
            interval_width,
        })
    }
}

impl Default for TrendSeasonal {
    fn default() -> Self {
        Self {
            name: "Trend + Weekly Seasonality".to_string(),
            interval_width: DEFAULT_INTERVAL_WIDTH,
        }
    }
}

impl ForecastModel for TrendSeasonal {
    type Trained = TrainedTrendSeasonal;

    fn train(&self, series: &DemandSeries) -> Result<Self::Trained> {
        require_fit_data(series)?;

        let points = series.points();
        let first_date = points[0].date;
        let last_date = points[points.len() - 1].date;
        let offset = |date: NaiveDate| (date - first_date).num_days() as f64;

        let xy: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (offset(p.date), p.total_demand))
            .collect();
        let regression = LinearRegression::fit(&xy)?;
        let line = regression.line();
        // Undefined for a perfectly flat history
        let r_squared = regression.r_squared().ok();

        let weekday_effects = if series.span_days() >= WEEKLY_MIN_SPAN_DAYS {
            let mut by_weekday: [Vec<f64>; 7] = Default::default();
            for (point, &(x, y)) in points.iter().zip(&xy) {
                let weekday = point.date.weekday().num_days_from_monday() as usize;
                by_weekday[weekday].push(y - line.at(x));
            }

            let mut effects = [0.0; 7];
            for (effect, residuals) in effects.iter_mut().zip(&by_weekday) {
                if !residuals.is_empty() {
                    *effect = mean(residuals)?;
                }
            }
            Some(effects)
        } else {
            None
        };

        let residuals: Vec<f64> = points
            .iter()
            .zip(&xy)
            .map(|(point, &(x, y))| y - fitted_value(&line, weekday_effects.as_ref(), x, point.date))
            .collect();
        let sigma = sample_std_dev(&residuals)?;

        debug!(
            slope = line.slope,
            intercept = line.intercept,
            r_squared,
            weekly = weekday_effects.is_some(),
            sigma,
            "fitted trend model"
        );

        Ok(TrainedTrendSeasonal {
            name: self.name.clone(),
            line,
            r_squared,
            weekday_effects,
            z: interval_z(self.interval_width)?,
            sigma,
            first_date,
            last_date,
            history: series.dates(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn fitted_value(line: &TrendLine, effects: Option<&[f64; 7]>, x: f64, date: NaiveDate) -> f64 {
    let seasonal = effects
        .map(|e| e[date.weekday().num_days_from_monday() as usize])
        .unwrap_or(0.0);
    line.at(x) + seasonal
}

impl TrainedTrendSeasonal {
    /// Share of variance the trend line explains, `None` for a flat history
    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }

    pub fn weekday_effects(&self) -> Option<&[f64; 7]> {
        self.weekday_effects.as_ref()
    }

    /// Residual standard deviation of the fit
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl TrainedForecastModel for TrainedTrendSeasonal {
    fn history_dates(&self) -> &[NaiveDate] {
        &self.history
    }

    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast> {
        require_increasing(dates)?;

        let n = self.history.len();
        let rows = dates
            .iter()
            .map(|&date| {
                let x = (date - self.first_date).num_days() as f64;
                let predicted = fitted_value(&self.line, self.weekday_effects.as_ref(), x, date);
                let steps_ahead = (date - self.last_date).num_days();
                let half = band_half_width(self.z, self.sigma, steps_ahead, n);
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
