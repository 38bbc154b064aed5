//! Forecast artifacts: the downloadable CSV, the text table and the JSON summary

use crate::error::Result;
use crate::models::{Forecast, ForecastRow};
use crate::selection::ProductKey;
use crate::utils::ForecastAccuracy;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// File name of the exported forecast
pub const FORECAST_FILENAME: &str = "forecast.csv";
/// MIME type of the exported forecast
pub const FORECAST_MIME: &str = "text/csv";

/// Header row of the exported forecast
pub const FORECAST_HEADERS: [&str; 4] = [
    "Date",
    "Predicted Demand",
    "Lower Confidence Interval",
    "Upper Confidence Interval",
];

#[derive(Serialize)]
struct ExportRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Predicted Demand")]
    predicted: f64,
    #[serde(rename = "Lower Confidence Interval")]
    lower: f64,
    #[serde(rename = "Upper Confidence Interval")]
    upper: f64,
}

impl From<&ForecastRow> for ExportRow {
    fn from(row: &ForecastRow) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            predicted: row.predicted,
            lower: row.lower,
            upper: row.upper,
        }
    }
}

/// Write every forecast row (history and horizon) as CSV
pub fn write_forecast_csv<W: Write>(writer: W, forecast: &Forecast) -> Result<()> {
    // Headers are written explicitly so an empty forecast still has them
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(FORECAST_HEADERS)?;
    for row in forecast.rows() {
        csv_writer.serialize(ExportRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// The exported CSV as UTF-8 bytes
pub fn forecast_csv_bytes(forecast: &Forecast) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_forecast_csv(&mut buffer, forecast)?;
    Ok(buffer)
}

/// Write the exported CSV to `path`
pub fn save_forecast_csv<P: AsRef<Path>>(path: P, forecast: &Forecast) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_forecast_csv(file, forecast)?;
    info!(path = %path.display(), rows = forecast.len(), "saved forecast");
    Ok(())
}

/// Render rows as an aligned text table
pub fn render_table(rows: &[ForecastRow]) -> String {
    let mut out = format!(
        "{:<12} {:>18} {:>26} {:>26}\n",
        FORECAST_HEADERS[0], FORECAST_HEADERS[1], FORECAST_HEADERS[2], FORECAST_HEADERS[3]
    );
    for row in rows {
        out.push_str(&format!(
            "{:<12} {:>18.2} {:>26.2} {:>26.2}\n",
            row.date.format("%Y-%m-%d").to_string(),
            row.predicted,
            row.lower,
            row.upper
        ));
    }
    out
}

/// Machine-readable description of one forecasting run
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSummary {
    pub product_code: String,
    pub warehouse: String,
    pub model: String,
    pub horizon: usize,
    pub interval_width: f64,
    pub cleaned_rows: usize,
    pub dropped_rows: usize,
    pub history_dates: usize,
    pub forecast_rows: usize,
    pub accuracy: Option<ForecastAccuracy>,
    pub top_pairs: Vec<PairCount>,
    pub tail: Vec<ForecastRow>,
}

/// Row count of one product/warehouse pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCount {
    pub product_code: String,
    pub warehouse: String,
    pub rows: usize,
}

impl From<&(ProductKey, usize)> for PairCount {
    fn from((key, rows): &(ProductKey, usize)) -> Self {
        Self {
            product_code: key.product_code.clone(),
            warehouse: key.warehouse.clone(),
            rows: *rows,
        }
    }
}

impl ForecastSummary {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
