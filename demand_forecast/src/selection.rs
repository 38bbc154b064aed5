//! Choice of the product/warehouse pair to forecast

use crate::cleaning::CleanRecord;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// A (product, warehouse) grouping key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub product_code: String,
    pub warehouse: String,
}

impl ProductKey {
    pub fn new(product_code: impl Into<String>, warehouse: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            warehouse: warehouse.into(),
        }
    }

    /// Whether `record` belongs to this pair
    pub fn matches(&self, record: &CleanRecord) -> bool {
        record.product_code == self.product_code && record.warehouse == self.warehouse
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product: {} | Warehouse: {}", self.product_code, self.warehouse)
    }
}

/// Row counts per pair, largest first; equal counts in key order.
///
/// Rows with a missing (empty) product code or warehouse cannot be grouped
/// and are not counted. Keys are compared as given, so a whitespace-only
/// value is a group of its own.
pub fn pair_counts(records: &[CleanRecord]) -> Vec<(ProductKey, usize)> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in records {
        if record.product_code.is_empty() || record.warehouse.is_empty() {
            continue;
        }
        *counts
            .entry((record.product_code.as_str(), record.warehouse.as_str()))
            .or_default() += 1;
    }

    let mut ranked: Vec<(ProductKey, usize)> = counts
        .into_iter()
        .map(|((product, warehouse), count)| (ProductKey::new(product, warehouse), count))
        .collect();
    // Stable sort keeps the BTreeMap key order among ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// The pair with the most rows; ties go to the smallest key.
pub fn select_pair(records: &[CleanRecord]) -> Result<ProductKey> {
    let (key, count) = pair_counts(records).into_iter().next().ok_or_else(|| {
        ForecastError::InsufficientData(
            "No rows with a valid date, demand, product and warehouse".to_string(),
        )
    })?;

    info!(product = %key.product_code, warehouse = %key.warehouse, rows = count, "selected most frequent pair");
    Ok(key)
}
