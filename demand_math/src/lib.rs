//! # Demand Math
//!
//! Mathematical building blocks for demand forecasting.
//! This crate provides the trend fitting, smoothing and summary statistics
//! that the forecasting models in `demand_forecast` are assembled from.

use thiserror::Error;

pub mod forecasting;
pub mod stats;

pub use forecasting::{DoubleExponentialSmoothing, LinearRegression, TrendLine};

/// Errors that can occur in demand-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for demand math operations
pub type Result<T> = std::result::Result<T, MathError>;
