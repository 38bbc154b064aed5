use chrono::NaiveDate;
use demand_forecast::models::{HoltSmoothing, TrendSeasonal};
use demand_forecast::pipeline::forecast_with;
use demand_forecast::{
    clean_records, select_pair, DemandSeries, ForecastConfig, ForecastError, Horizon, ModelKind,
    Pipeline, ProductKey, RawRecord,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn scenario_rows() -> Vec<RawRecord> {
    vec![
        RawRecord::new("2023-01-01", "A", "W1", "100"),
        RawRecord::new("2023-01-01", "A", "W1", "(20)"),
        RawRecord::new("2023-01-02", "A", "W1", "50"),
    ]
}

/// Two months of orders for three pairs, B/W2 being the busiest
fn busy_rows() -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    let mut rows = Vec::new();
    for day in 0..60 {
        let date = (start + chrono::Duration::days(day)).format("%Y-%m-%d").to_string();
        rows.push(RawRecord::new(&date, "B", "W2", &format!("{}", 100 + day)));
        rows.push(RawRecord::new(&date, "B", "W2", "(10)"));
        if day % 3 == 0 {
            rows.push(RawRecord::new(&date, "A", "W1", "70"));
        }
        if day % 5 == 0 {
            rows.push(RawRecord::new(&date, "C", "W1", "oops"));
        }
    }
    rows
}

#[test]
fn test_end_to_end_scenario() {
    let output = Pipeline::default().run(&scenario_rows()).unwrap();

    assert_eq!(output.key, ProductKey::new("A", "W1"));
    assert_eq!(output.cleaned_rows, 3);
    assert_eq!(output.dropped_rows, 0);
    assert_eq!(
        output.series.dates(),
        vec![
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        ]
    );
    assert_eq!(output.series.values(), vec![80.0, 50.0]);
}

#[rstest]
#[case(ModelKind::Trend, 7)]
#[case(ModelKind::Trend, 60)]
#[case(ModelKind::Holt, 30)]
fn test_forecast_row_counts(#[case] model: ModelKind, #[case] horizon: usize) {
    let config = ForecastConfig {
        model,
        horizon,
        ..ForecastConfig::default()
    };
    let output = Pipeline::new(config).run(&busy_rows()).unwrap();

    assert_eq!(output.key, ProductKey::new("B", "W2"));
    assert_eq!(output.forecast.history_len(), output.series.len());
    assert_eq!(output.forecast.len(), output.series.len() + horizon);
    assert_eq!(output.table().len(), horizon);

    let last_observed = output.series.last_date().unwrap();
    assert!(output.forecast.future().iter().all(|r| r.date > last_observed));
    assert!(output
        .forecast
        .rows()
        .iter()
        .all(|r| r.lower <= r.predicted && r.predicted <= r.upper));
}

#[test]
fn test_invalid_rows_are_dropped_not_fatal() {
    let output = Pipeline::default().run(&busy_rows()).unwrap();

    // Every fifth day carried an unparseable C/W1 line
    assert_eq!(output.dropped_rows, 12);
    assert!(output.pair_counts.iter().all(|(key, _)| key.product_code != "C"));
}

#[test]
fn test_aggregation_ignores_row_order() {
    let rows = busy_rows();
    let mut shuffled = rows.clone();
    shuffled.reverse();
    shuffled.rotate_left(17);

    let key = ProductKey::new("B", "W2");
    let forward = DemandSeries::aggregate(&clean_records(&rows).records, &key);
    let backward = DemandSeries::aggregate(&clean_records(&shuffled).records, &key);

    assert_eq!(forward, backward);
    assert_eq!(forward.values()[0], 90.0);
}

#[test]
fn test_selection_is_repeatable() {
    let cleaned = clean_records(&busy_rows());
    let first = select_pair(&cleaned.records).unwrap();

    for _ in 0..5 {
        assert_eq!(select_pair(&cleaned.records).unwrap(), first);
    }
}

#[test]
fn test_no_usable_rows() {
    let rows = vec![
        RawRecord::new("not-a-date", "A", "W1", "10"),
        RawRecord::new("2023-01-01", "A", "W1", "n/a"),
    ];

    let result = Pipeline::default().run(&rows);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_single_date_fails_in_the_forecaster() {
    let rows = vec![
        RawRecord::new("2023-01-01", "A", "W1", "10"),
        RawRecord::new("2023-01-01", "A", "W1", "15"),
    ];

    let result = Pipeline::default().run(&rows);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_out_of_range_dates_are_dropped() {
    let rows = vec![
        RawRecord::new("+262142-12-01", "A", "W1", "10"),
        RawRecord::new("+262142-12-02", "A", "W1", "15"),
        RawRecord::new("9999-12-31", "A", "W1", "20"),
    ];

    let result = Pipeline::default().run(&rows);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_latest_supported_dates_still_forecast() {
    let rows = vec![
        RawRecord::new("2262-04-10", "A", "W1", "10"),
        RawRecord::new("2262-04-11", "A", "W1", "15"),
    ];
    let config = ForecastConfig {
        horizon: 60,
        ..ForecastConfig::default()
    };

    let output = Pipeline::new(config).run(&rows).unwrap();
    assert_eq!(output.forecast.len(), 62);
    assert_eq!(
        output.forecast.rows()[61].date,
        NaiveDate::from_ymd_opt(2262, 6, 10).unwrap()
    );
}

#[test]
fn test_invalid_horizon_is_rejected() {
    let config = ForecastConfig {
        horizon: 5,
        ..ForecastConfig::default()
    };

    let result = Pipeline::new(config).run(&scenario_rows());
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_models_share_the_contract() {
    let cleaned = clean_records(&busy_rows());
    let series = DemandSeries::aggregate(&cleaned.records, &ProductKey::new("B", "W2"));
    let horizon = Horizon::new(14).unwrap();

    let (_, trend) = forecast_with(&TrendSeasonal::default(), &series, horizon).unwrap();
    let (name, holt) =
        forecast_with(&HoltSmoothing::with_params(0.5, 0.3).unwrap(), &series, horizon).unwrap();

    assert!(name.starts_with("Holt"));
    let trend_dates: Vec<_> = trend.rows().iter().map(|r| r.date).collect();
    let holt_dates: Vec<_> = holt.rows().iter().map(|r| r.date).collect();
    assert_eq!(trend_dates, holt_dates);

    // Demand grows by one unit a day; both models should see it
    assert!(trend.future()[13].predicted > trend.history()[0].predicted);
    assert!(holt.future()[13].predicted > holt.history()[0].predicted);
}

#[test]
fn test_summary_lists_top_pairs() {
    let output = Pipeline::default().run(&busy_rows()).unwrap();
    let summary = output.summary(0.8);

    assert_eq!(summary.top_pairs.len(), 2);
    assert_eq!(summary.top_pairs[0].product_code, "B");
    assert_eq!(summary.top_pairs[0].rows, 120);
    assert_eq!(summary.tail.len(), 30);

    let json = summary.to_json().unwrap();
    assert!(json.contains("\"warehouse\": \"W2\""));
}
