//! End-to-end run: clean, select, aggregate, fit, predict

use crate::cleaning::clean_records;
use crate::config::ForecastConfig;
use crate::data::RawRecord;
use crate::error::Result;
use crate::export::{ForecastSummary, PairCount};
use crate::models::{
    Forecast, ForecastModel, ForecastRow, Horizon, HoltSmoothing, ModelKind,
    TrainedForecastModel, TrendSeasonal,
};
use crate::selection::{pair_counts, select_pair, ProductKey};
use crate::series::DemandSeries;
use crate::utils::{forecast_accuracy, ForecastAccuracy};
use tracing::{info, warn};

/// How many ranked pairs a summary lists
const TOP_PAIRS: usize = 5;

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The forecasted product/warehouse pair
    pub key: ProductKey,
    /// Pairs ranked by row count
    pub pair_counts: Vec<(ProductKey, usize)>,
    pub cleaned_rows: usize,
    pub dropped_rows: usize,
    pub series: DemandSeries,
    pub horizon: Horizon,
    pub model_name: String,
    pub forecast: Forecast,
    /// In-sample fit quality over the historical rows
    pub accuracy: Option<ForecastAccuracy>,
}

impl PipelineOutput {
    /// The forecast table shown to the user: the last `horizon` rows
    pub fn table(&self) -> &[ForecastRow] {
        self.forecast.tail(self.horizon.days())
    }

    /// Summary for JSON output
    pub fn summary(&self, interval_width: f64) -> ForecastSummary {
        ForecastSummary {
            product_code: self.key.product_code.clone(),
            warehouse: self.key.warehouse.clone(),
            model: self.model_name.clone(),
            horizon: self.horizon.days(),
            interval_width,
            cleaned_rows: self.cleaned_rows,
            dropped_rows: self.dropped_rows,
            history_dates: self.series.len(),
            forecast_rows: self.forecast.len(),
            accuracy: self.accuracy.clone(),
            top_pairs: self.pair_counts.iter().take(TOP_PAIRS).map(PairCount::from).collect(),
            tail: self.table().to_vec(),
        }
    }
}

/// A stateless forecasting run over one input
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ForecastConfig,
}

impl Pipeline {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run every stage over `raw`
    pub fn run(&self, raw: &[RawRecord]) -> Result<PipelineOutput> {
        self.config.validate()?;
        let horizon = self.config.horizon()?;

        let cleaned = clean_records(raw);
        let ranked = pair_counts(&cleaned.records);
        let key = select_pair(&cleaned.records)?;
        let series = DemandSeries::aggregate(&cleaned.records, &key);

        let (model_name, forecast) = match self.config.model {
            ModelKind::Trend => {
                let model = TrendSeasonal::new(self.config.interval_width)?;
                forecast_with(&model, &series, horizon)?
            }
            ModelKind::Holt => {
                let model = HoltSmoothing::new(
                    self.config.holt_alpha,
                    self.config.holt_beta,
                    self.config.interval_width,
                )?;
                forecast_with(&model, &series, horizon)?
            }
        };

        let fitted: Vec<f64> = forecast.history().iter().map(|r| r.predicted).collect();
        let accuracy = match forecast_accuracy(&fitted, &series.values()) {
            Ok(accuracy) => Some(accuracy),
            Err(err) => {
                warn!(error = %err, "could not compute fit accuracy");
                None
            }
        };

        info!(
            %key,
            model = %model_name,
            history = forecast.history_len(),
            horizon = horizon.days(),
            "forecast complete"
        );

        Ok(PipelineOutput {
            key,
            pair_counts: ranked,
            cleaned_rows: cleaned.records.len(),
            dropped_rows: cleaned.dropped,
            series,
            horizon,
            model_name,
            forecast,
            accuracy,
        })
    }
}

/// Fit `model`, extend the dates by `horizon` and predict them all
pub fn forecast_with<M: ForecastModel>(
    model: &M,
    series: &DemandSeries,
    horizon: Horizon,
) -> Result<(String, Forecast)> {
    let trained = model.train(series)?;
    let dates = trained.make_future_dates(horizon.days())?;
    let forecast = trained.predict(&dates)?;
    Ok((trained.name().to_string(), forecast))
}
