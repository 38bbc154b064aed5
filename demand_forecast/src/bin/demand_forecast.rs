//! # demand_forecast
//!
//! Command-line front end: load a demand history, forecast the busiest
//! product/warehouse pair and export `forecast.csv`.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use demand_forecast::export::{render_table, save_forecast_csv, FORECAST_FILENAME, FORECAST_MIME};
use demand_forecast::sample::{self, SampleSpec};
use demand_forecast::{DataLoader, ForecastConfig, ModelKind, Pipeline};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "demand_forecast")]
#[command(about = "Short-term product demand forecasting", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the most frequently ordered product/warehouse pair
    Forecast {
        /// Historical demand CSV (Date, Product_Code, Warehouse, Order_Demand)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Forecast horizon in days
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(7..=60))]
        periods: Option<u64>,

        /// Model type (trend, holt)
        #[arg(short, long)]
        model: Option<ModelKind>,

        /// Prediction interval width, between 0 and 1
        #[arg(long)]
        interval_width: Option<f64>,

        /// Where to write the forecast CSV
        #[arg(short, long, default_value = FORECAST_FILENAME)]
        output: PathBuf,

        /// Report format on stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Configuration file (TOML, YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a synthetic demand history to try the forecaster on
    Sample {
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Days of history to generate
        #[arg(short, long, default_value = "180")]
        days: usize,

        /// Mean order lines per weekday
        #[arg(long, default_value = "6.0")]
        orders_per_day: f64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Initializes tracing on stderr, `RUST_LOG` taking precedence over `level`
fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("demand_forecast={level},demand_math={level}");
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Forecast {
            input,
            periods,
            model,
            interval_width,
            output,
            format,
            config,
        } => {
            let mut settings = ForecastConfig::load(config.as_deref())
                .context("failed to load configuration")?;
            init_tracing(&settings.log_level, settings.log_json);

            // Flags override file and environment
            if let Some(periods) = periods {
                settings.horizon = periods as usize;
            }
            if let Some(model) = model {
                settings.model = model;
            }
            if let Some(width) = interval_width {
                settings.interval_width = width;
            }
            settings.validate()?;

            let Some(input) = input else {
                println!("Please provide a CSV file with historical product demand (--input FILE).");
                return Ok(());
            };

            let raw = DataLoader::from_csv(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let interval_width = settings.interval_width;
            let result = Pipeline::new(settings).run(&raw)?;

            save_forecast_csv(&output, &result.forecast)
                .with_context(|| format!("failed to write {}", output.display()))?;

            match format {
                OutputFormat::Json => {
                    println!("{}", result.summary(interval_width).to_json()?);
                }
                OutputFormat::Text => {
                    println!("Forecasting for {}", result.key);
                    println!(
                        "Rows used: {} ({} dropped with an unparseable date or demand)",
                        result.cleaned_rows, result.dropped_rows
                    );
                    println!(
                        "Model: {} | history: {} dates | horizon: {} days",
                        result.model_name,
                        result.series.len(),
                        result.horizon.days()
                    );
                    println!();
                    println!("Forecast Table");
                    print!("{}", render_table(result.table()));
                    if let Some(accuracy) = &result.accuracy {
                        println!();
                        print!("{}", accuracy);
                    }
                    println!();
                    println!(
                        "Saved {} ({}, {} rows)",
                        output.display(),
                        FORECAST_MIME,
                        result.forecast.len()
                    );
                }
            }
        }
        Commands::Sample {
            output,
            days,
            orders_per_day,
            seed,
        } => {
            init_tracing("info", false);

            let spec = SampleSpec {
                days,
                orders_per_day,
                seed,
                ..SampleSpec::default()
            };
            let records = sample::generate(&spec)?;
            let file = File::create(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            sample::write_csv(file, &records)?;

            info!(rows = records.len(), path = %output.display(), "wrote sample history");
            println!("Wrote {} order lines to {}", records.len(), output.display());
        }
    }

    Ok(())
}
