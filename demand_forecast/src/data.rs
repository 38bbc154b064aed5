//! Raw order data loading

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Header of the order date column
pub const DATE_COLUMN: &str = "Date";
/// Header of the ordered quantity column
pub const DEMAND_COLUMN: &str = "Order_Demand";
/// Header of the product code column
pub const PRODUCT_COLUMN: &str = "Product_Code";
/// Header of the warehouse column
pub const WAREHOUSE_COLUMN: &str = "Warehouse";

/// Columns every input file must carry
pub const REQUIRED_COLUMNS: [&str; 4] =
    [DATE_COLUMN, DEMAND_COLUMN, PRODUCT_COLUMN, WAREHOUSE_COLUMN];

/// One order line exactly as it appears in the input file.
///
/// Every field is optional text: nothing is validated until cleaning, and an
/// empty cell is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Product_Code")]
    pub product_code: Option<String>,
    #[serde(rename = "Warehouse")]
    pub warehouse: Option<String>,
    #[serde(rename = "Order_Demand")]
    pub order_demand: Option<String>,
}

impl RawRecord {
    /// Build a record from plain strings
    pub fn new(date: &str, product_code: &str, warehouse: &str, order_demand: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            product_code: Some(product_code.to_string()),
            warehouse: Some(warehouse.to_string()),
            order_demand: Some(order_demand.to_string()),
        }
    }
}

/// Data loader for historical demand files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load raw records from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading demand history");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load raw records from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        Self::check_columns(&headers)?;

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: RawRecord = result?;
            records.push(record);
        }

        debug!(rows = records.len(), "read raw rows");
        Ok(records)
    }

    /// Verify that every required column is present
    fn check_columns(headers: &csv::StringRecord) -> Result<()> {
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(ForecastError::MissingColumn(required.to_string()));
            }
        }

        Ok(())
    }
}
