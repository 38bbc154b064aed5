//! Utility functions for the demand_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// The `horizon` calendar days following `last_date`
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as i64)
        .map(|i| {
            last_date.checked_add_signed(Duration::days(i)).ok_or_else(|| {
                ForecastError::ForecastingError(format!(
                    "Forecast date {} days after {} is out of range",
                    i, last_date
                ))
            })
        })
        .collect()
}

/// Calculate accuracy metrics for fitted values vs observed values
pub fn forecast_accuracy(fitted: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if fitted.len() != actual.len() || fitted.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Fitted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = fitted.len() as f64;
    let errors: Vec<f64> = fitted
        .iter()
        .zip(actual)
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // Zero demand days have no defined percentage error
    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(&errors)
        .filter(|(a, _)| **a != 0.0)
        .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        None
    } else {
        Some(percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64)
    };

    let smape = actual
        .iter()
        .zip(fitted)
        .map(|(&a, &f)| {
            let denominator = a.abs() + f.abs();
            if denominator == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / denominator
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

/// In-sample accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error over non-zero days
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fit Accuracy (in-sample):")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        match self.mape {
            Some(mape) => writeln!(f, "  MAPE:  {:.4}%", mape)?,
            None => writeln!(f, "  MAPE:  n/a")?,
        }
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_future_dates_cross_month_end() {
        let last = NaiveDate::from_ymd_opt(2023, 1, 30).unwrap();
        let dates = future_dates(last, 3).unwrap();

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 2, 2).unwrap(),
            ]
        );
        assert!(future_dates(last, 0).unwrap().is_empty());
    }

    #[test]
    fn test_future_dates_past_calendar_end() {
        let result = future_dates(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(ForecastError::ForecastingError(_))));

        let near_end = NaiveDate::MAX - Duration::days(3);
        assert!(future_dates(near_end, 3).is_ok());
        assert!(future_dates(near_end, 7).is_err());
    }

    #[test]
    fn test_forecast_accuracy() {
        let accuracy = forecast_accuracy(&[105.0, 106.0, 107.0], &[106.0, 107.0, 108.0]).unwrap();
        assert_relative_eq!(accuracy.mae, 1.0);
        assert_relative_eq!(accuracy.rmse, 1.0);
        assert!(accuracy.mape.unwrap() < 1.0);

        let zeros = forecast_accuracy(&[1.0], &[0.0]).unwrap();
        assert_eq!(zeros.mape, None);

        assert!(forecast_accuracy(&[], &[]).is_err());
    }
}
