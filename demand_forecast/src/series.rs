//! Daily demand series for one product/warehouse pair

use crate::cleaning::CleanRecord;
use crate::selection::ProductKey;
use chrono::NaiveDate;
use demand_math::stats::stable_sum;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Total demand on one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandPoint {
    pub date: NaiveDate,
    pub total_demand: f64,
}

/// Date-ordered totals, one point per distinct date with orders.
///
/// Dates without orders are absent, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemandSeries {
    points: Vec<DemandPoint>,
}

impl DemandSeries {
    /// Build a series from points, sorting by date and merging duplicates
    pub fn from_points(points: impl IntoIterator<Item = DemandPoint>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for point in points {
            by_date.entry(point.date).or_default().push(point.total_demand);
        }

        Self::from_grouped(by_date)
    }

    /// Sum the demand of every record matching `key`, per date
    pub fn aggregate(records: &[CleanRecord], key: &ProductKey) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for record in records.iter().filter(|r| key.matches(r)) {
            by_date.entry(record.date).or_default().push(record.order_demand);
        }

        let series = Self::from_grouped(by_date);
        info!(%key, dates = series.len(), "aggregated daily demand");
        series
    }

    fn from_grouped(by_date: BTreeMap<NaiveDate, Vec<f64>>) -> Self {
        let points = by_date
            .into_iter()
            .map(|(date, values)| DemandPoint {
                date,
                total_demand: stable_sum(&values),
            })
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[DemandPoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total_demand).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Calendar days covered from first to last date, inclusive
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
