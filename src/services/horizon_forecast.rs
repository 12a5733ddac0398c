use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::sprint::weeks;
use crate::services::forecast_error::ForecastError;
use crate::services::stats::{
    self, Stability, Trend, TrendDirection, TrendStrength, classify_stability, detect_low_outliers,
    detect_trend,
};

pub const DEFAULT_HORIZONS: [u32; 5] = [1, 2, 3, 4, 6];
const MIN_SPRINTS: usize = 2;
const RECENT_SPRINTS: usize = 2;
const RECENT_WEIGHT_SHARE: f64 = 0.5;

/// Percentile, z-score and safety discount for each reported projection.
const PROJECTION_LEVELS: [(u8, f64, f64); 3] = [(50, 0.0, 1.00), (85, 1.036, 0.95), (95, 1.645, 0.90)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonOptions {
    /// Give the last two sprints half of the total weight.
    pub use_weighting: bool,
    pub exclude_outliers: bool,
    /// Horizon lengths in sprints.
    pub horizons: Vec<u32>,
    pub trend_decay: f64,
    pub strong_trend_boost: f64,
    pub moderate_trend_boost: f64,
}

impl Default for HorizonOptions {
    fn default() -> Self {
        Self {
            use_weighting: false,
            exclude_outliers: false,
            horizons: DEFAULT_HORIZONS.to_vec(),
            trend_decay: 0.85,
            strong_trend_boost: 0.75,
            moderate_trend_boost: 0.5,
        }
    }
}

impl HorizonOptions {
    fn boost_factor(&self, strength: TrendStrength) -> f64 {
        match strength {
            TrendStrength::Strong => self.strong_trend_boost,
            TrendStrength::Moderate => self.moderate_trend_boost,
            TrendStrength::None => 0.0,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HorizonProjection {
    pub sprints: u32,
    pub weeks: u32,
    pub p50: u64,
    pub p85: u64,
    pub p95: u64,
    pub mean: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HorizonMetadata {
    pub sprints_analyzed: usize,
    pub sprints_used: usize,
    pub outliers: Vec<f64>,
    pub weighted: bool,
    /// Read from the raw series, before outlier removal.
    pub trend: Trend,
    /// Read from the series actually used for projections.
    pub stability: Stability,
    pub base_mean: f64,
    pub base_std_dev: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HorizonResult {
    pub projections: Vec<HorizonProjection>,
    pub metadata: HorizonMetadata,
}

impl HorizonResult {
    pub fn projection(&self, sprints: u32) -> Option<&HorizonProjection> {
        self.projections.iter().find(|p| p.sprints == sprints)
    }
}

/// Requires at least two finite, non-negative values.
pub fn validate_series(values: &[f64]) -> Result<(), ForecastError> {
    if values.len() < MIN_SPRINTS {
        return Err(ForecastError::InsufficientData {
            required: MIN_SPRINTS,
            available: values.len(),
        });
    }
    if let Some((index, value)) = values
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite() || **value < 0.0)
    {
        return Err(ForecastError::InvalidInput {
            index,
            value: *value,
        });
    }
    Ok(())
}

/// Per-sprint weights summing to one.
///
/// With recency weighting and more than two sprints, the last two share half
/// of the mass and the older sprints share the other half.
pub fn recency_weights(len: usize, use_weighting: bool) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    if !use_weighting || len <= RECENT_SPRINTS {
        return vec![1.0 / len as f64; len];
    }
    let older = len - RECENT_SPRINTS;
    let older_weight = (1.0 - RECENT_WEIGHT_SHARE) / older as f64;
    let recent_weight = RECENT_WEIGHT_SHARE / RECENT_SPRINTS as f64;
    (0..len)
        .map(|index| if index < older { older_weight } else { recent_weight })
        .collect()
}

/// Closed-form projections of team output over several future horizons.
pub fn forecast_horizons(
    series: &[f64],
    options: &HorizonOptions,
) -> Result<HorizonResult, ForecastError> {
    validate_series(series)?;
    if options.horizons.is_empty() || options.horizons.contains(&0) {
        return Err(ForecastError::InvalidHorizon {
            horizons: options.horizons.clone(),
        });
    }

    let (used, outliers) = if options.exclude_outliers {
        let split = detect_low_outliers(series);
        if split.kept.len() < MIN_SPRINTS {
            return Err(ForecastError::InsufficientData {
                required: MIN_SPRINTS,
                available: split.kept.len(),
            });
        }
        (split.kept, split.outliers)
    } else {
        (series.to_vec(), Vec::new())
    };
    if !outliers.is_empty() {
        warn!(?outliers, "excluding low outlier sprints from horizon forecast");
    }

    let weights = recency_weights(used.len(), options.use_weighting);
    let mean = stats::weighted_mean(&used, &weights);
    let std_dev = stats::weighted_std_dev(&used, &weights);
    let trend = detect_trend(series);

    info!(
        sprints = series.len(),
        used = used.len(),
        mean,
        std_dev,
        trend = ?trend.direction,
        "forecasting horizons"
    );

    let projections = options
        .horizons
        .iter()
        .map(|horizon| project(*horizon, mean, std_dev, &trend, options))
        .collect();

    Ok(HorizonResult {
        projections,
        metadata: HorizonMetadata {
            sprints_analyzed: series.len(),
            sprints_used: used.len(),
            outliers,
            weighted: options.use_weighting && used.len() > RECENT_SPRINTS,
            trend,
            stability: classify_stability(&used),
            base_mean: stats::round_to(mean, 1),
            base_std_dev: stats::round_to(std_dev, 1),
        },
    })
}

fn project(horizon: u32, mean: f64, std_dev: f64, trend: &Trend, options: &HorizonOptions) -> HorizonProjection {
    let sprints = f64::from(horizon);
    let mut horizon_mean = sprints * mean;
    // Trends only ever raise the estimate.
    if trend.direction == TrendDirection::Up {
        let decayed_sprints: f64 = (0..horizon)
            .map(|k| options.trend_decay.powi(k as i32))
            .sum();
        horizon_mean += options.boost_factor(trend.strength) * trend.slope * decayed_sprints;
    }
    let horizon_std_dev = sprints.sqrt() * std_dev;

    let [p50, p85, p95] = PROJECTION_LEVELS.map(|(_, z_score, safety)| {
        let value = (horizon_mean + z_score * horizon_std_dev) * safety;
        value.max(0.0).round() as u64
    });

    HorizonProjection {
        sprints: horizon,
        weeks: weeks(horizon),
        p50,
        p85,
        p95,
        mean: horizon_mean.max(0.0).round() as u64,
    }
}
