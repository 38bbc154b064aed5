use demand_forecast::export::render_table;
use demand_forecast::models::{HoltSmoothing, TrendSeasonal};
use demand_forecast::pipeline::forecast_with;
use demand_forecast::sample::{self, SampleSpec};
use demand_forecast::{clean_records, select_pair, DemandSeries, Horizon};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Basic Forecasting Example");
    println!("==========================================\n");

    // Synthetic history: three products in two warehouses over four months
    let raw = sample::generate(&SampleSpec {
        days: 120,
        ..SampleSpec::default()
    })?;
    println!("Generated {} raw order lines", raw.len());

    let cleaned = clean_records(&raw);
    println!(
        "{} rows kept, {} dropped\n",
        cleaned.records.len(),
        cleaned.dropped
    );

    let key = select_pair(&cleaned.records)?;
    let series = DemandSeries::aggregate(&cleaned.records, &key);
    println!("Forecasting for {} ({} dates)\n", key, series.len());

    let horizon = Horizon::new(14)?;

    // Compare the two built-in models on the same series
    let (trend_name, trend) = forecast_with(&TrendSeasonal::new(0.8)?, &series, horizon)?;
    println!("{}", trend_name);
    print!("{}", render_table(trend.tail(horizon.days())));

    let (holt_name, holt) = forecast_with(&HoltSmoothing::new(0.3, 0.1, 0.8)?, &series, horizon)?;
    println!("\n{}", holt_name);
    print!("{}", render_table(holt.tail(horizon.days())));

    Ok(())
}
