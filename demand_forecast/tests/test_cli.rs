use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_demand_forecast"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_forecast_without_input_only_prompts() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["forecast"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim(),
        "Please provide a CSV file with historical product demand (--input FILE)."
    );
    assert!(!dir.path().join("forecast.csv").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_forecast_writes_the_csv() {
    let dir = TempDir::new().unwrap();
    let sample = run_cli(&dir, &["sample", "--output", "history.csv", "--days", "60"]);
    assert!(sample.status.success());

    let output = run_cli(&dir, &["forecast", "--input", "history.csv", "--periods", "14"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Forecasting for Product: Product_1359"));
    assert!(stdout.contains("Forecast Table"));

    let csv = fs::read_to_string(dir.path().join("forecast.csv")).unwrap();
    assert!(csv.starts_with("Date,Predicted Demand,Lower Confidence Interval,Upper Confidence Interval"));
}

#[test]
fn test_out_of_range_periods_are_rejected() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["forecast", "--periods", "61"]);

    assert!(!output.status.success());
    assert!(!dir.path().join("forecast.csv").exists());
}
