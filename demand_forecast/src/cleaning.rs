//! Normalisation of raw order rows
//!
//! A row survives only if both its date and its demand parse. Failures are
//! never errors: the row is dropped and counted.

use crate::data::RawRecord;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// First and last calendar days representable as nanosecond timestamps
const EARLIEST_DATE: (i32, u32, u32) = (1677, 9, 22);
const LATEST_DATE: (i32, u32, u32) = (2262, 4, 11);

/// An order line whose date and demand both parsed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    pub date: NaiveDate,
    pub product_code: String,
    pub warehouse: String,
    pub order_demand: f64,
}

/// Result of cleaning a batch of raw rows
#[derive(Debug, Clone, Default)]
pub struct CleanedData {
    /// Rows that passed both conversions, in input order
    pub records: Vec<CleanRecord>,
    /// Number of rows removed
    pub dropped: usize,
}

/// Parse an order date, tolerating surrounding whitespace.
///
/// Time-of-day components are discarded; the series is daily. Dates outside
/// 1677-09-22 to 2262-04-11 are treated as unparseable.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_calendar_date(raw.trim()).filter(|date| {
        let day = (date.year(), date.month(), date.day());
        (EARLIEST_DATE..=LATEST_DATE).contains(&day)
    })
}

fn parse_calendar_date(trimmed: &str) -> Option<NaiveDate> {
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Parse an order quantity.
///
/// The accounting form `(120)` reads as `-120`. Any other parenthesis is
/// replaced by `-`, which leaves an unparseable number. Non-finite values are
/// rejected.
pub fn parse_demand(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();

    let value = match trimmed.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) if !inner.trim_start().starts_with(['-', '+']) => {
            inner.trim().parse::<f64>().ok().map(|amount| -amount)
        }
        _ => trimmed.replace(['(', ')'], "-").parse::<f64>().ok(),
    };

    value.filter(|value| value.is_finite())
}

/// Convert one raw row, or `None` if it must be dropped
pub fn clean_record(raw: &RawRecord) -> Option<CleanRecord> {
    let date = raw.date.as_deref().and_then(parse_date)?;
    let order_demand = raw.order_demand.as_deref().and_then(parse_demand)?;

    Some(CleanRecord {
        date,
        product_code: raw.product_code.clone().unwrap_or_default(),
        warehouse: raw.warehouse.clone().unwrap_or_default(),
        order_demand,
    })
}

/// Clean a batch of raw rows, keeping input order
pub fn clean_records(raw: &[RawRecord]) -> CleanedData {
    let records: Vec<CleanRecord> = raw.iter().filter_map(clean_record).collect();
    let dropped = raw.len() - records.len();

    if dropped > 0 {
        warn!(dropped, kept = records.len(), "dropped rows with unparseable date or demand");
    } else {
        info!(kept = records.len(), "all rows parsed");
    }

    CleanedData { records, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2023-01-05", ymd(2023, 1, 5))]
    #[case("  2023-01-05 ", ymd(2023, 1, 5))]
    #[case("2012/7/27", ymd(2012, 7, 27))]
    #[case("01/15/2023", ymd(2023, 1, 15))]
    #[case("2023-01-15 14:30:45", ymd(2023, 1, 15))]
    #[case("2023-01-15T14:30:45", ymd(2023, 1, 15))]
    #[case("2023-01-15T14:30:45+02:00", ymd(2023, 1, 15))]
    #[case("1677-09-22", ymd(1677, 9, 22))]
    #[case("2262-04-11", ymd(2262, 4, 11))]
    fn test_parse_date(#[case] raw: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(raw), Some(expected));
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("")]
    #[case("2023-02-30")]
    #[case("9999-12-31")]
    #[case("+262142-12-01")]
    #[case("1677-09-21")]
    #[case("2262-04-12")]
    fn test_parse_date_failures(#[case] raw: &str) {
        assert_eq!(parse_date(raw), None);
    }

    #[rstest]
    #[case("100", 100.0)]
    #[case(" 42 ", 42.0)]
    #[case("(120)", -120.0)]
    #[case("(5) ", -5.0)]
    #[case("-7", -7.0)]
    #[case("12.5", 12.5)]
    #[case("( 7.5 )", -7.5)]
    fn test_parse_demand(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(parse_demand(raw), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("NaN")]
    #[case("inf")]
    #[case("()")]
    #[case("-5-")]
    #[case("5)")]
    #[case("(-5)")]
    #[case("((5))")]
    fn test_parse_demand_failures(#[case] raw: &str) {
        assert_eq!(parse_demand(raw), None);
    }

    #[test]
    fn test_row_dropped_when_either_field_fails() {
        let raw = vec![
            RawRecord::new("not-a-date", "A", "W1", "10"),
            RawRecord::new("2023-01-01", "A", "W1", "ten"),
            RawRecord::new("2023-01-01", "A", "W1", "10"),
            RawRecord {
                date: None,
                ..RawRecord::new("", "A", "W1", "10")
            },
        ];

        let cleaned = clean_records(&raw);
        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.dropped, 3);
        assert_eq!(cleaned.records[0].order_demand, 10.0);
    }
}
