//! # DemandOwl
//!
//! `demand_owl_workspace` ties together the DemandOwl crates:
//!
//! - [`math`]: trend fitting, smoothing and order-independent statistics
//! - [`forecast`]: cleaning, pair selection, aggregation, forecasting and export
//!
//! ## Example
//!
//! ```
//! use demand_owl_workspace::forecast::{ForecastConfig, Pipeline, RawRecord};
//!
//! let raw = vec![
//!     RawRecord::new("2023-01-01", "A", "W1", "100"),
//!     RawRecord::new("2023-01-01", "A", "W1", "(20)"),
//!     RawRecord::new("2023-01-02", "A", "W1", "50"),
//! ];
//!
//! let output = Pipeline::new(ForecastConfig::default()).run(&raw).unwrap();
//! assert_eq!(output.key.product_code, "A");
//! assert_eq!(output.series.values(), vec![80.0, 50.0]);
//! assert_eq!(output.forecast.len(), 2 + 30);
//! ```

pub use demand_forecast as forecast;
pub use demand_math as math;

/// Crate versions bundled in this workspace
pub fn versions() -> Vec<(&'static str, &'static str)> {
    vec![
        (env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        (demand_forecast::NAME, demand_forecast::VERSION),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_lists_members() {
        let versions = versions();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].0, "demand_forecast");
    }

    #[test]
    fn test_reexports_resolve() {
        let key = forecast::ProductKey::new("A", "W1");
        assert_eq!(key.to_string(), "Product: A | Warehouse: W1");
        assert_eq!(math::stats::stable_sum(&[1.0, 2.0]), 3.0);
    }
}
