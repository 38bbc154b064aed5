//! # Demand Forecast
//!
//! A Rust library for short-term product demand forecasting from historical
//! order files.
//!
//! ## Pipeline
//!
//! - **Ingest** raw order lines (`Date`, `Product_Code`, `Warehouse`, `Order_Demand`)
//! - **Clean** dates and quantities, dropping rows where either fails to parse
//!   (accounting negatives such as `(120)` read as `-120`)
//! - **Select** the product/warehouse pair with the most rows
//! - **Aggregate** that pair's demand per calendar date
//! - **Forecast** every observed date plus a 7 to 60 day horizon, with
//!   lower/upper bounds
//! - **Export** the result as `forecast.csv`
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::{DataLoader, ForecastConfig, Pipeline};
//!
//! let raw = DataLoader::from_csv("Historical Product Demand.csv")?;
//! let output = Pipeline::new(ForecastConfig::default()).run(&raw)?;
//!
//! println!("Forecasting for {}", output.key);
//! demand_forecast::export::save_forecast_csv("forecast.csv", &output.forecast)?;
//! # Ok::<(), demand_forecast::ForecastError>(())
//! ```

pub mod cleaning;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod sample;
pub mod selection;
pub mod series;
pub mod utils;

// Re-export commonly used types
pub use crate::cleaning::{clean_records, CleanRecord, CleanedData};
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, RawRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{
    Forecast, ForecastModel, ForecastRow, Horizon, ModelKind, TrainedForecastModel,
};
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::selection::{select_pair, ProductKey};
pub use crate::series::{DemandPoint, DemandSeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
