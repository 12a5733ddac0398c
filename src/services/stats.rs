//! Statistical primitives shared by both forecasters.
//!
//! Conventions:
//! - Empty input yields `0.0` rather than an error; callers validate their
//!   series before relying on a result.
//! - Percentiles linearly interpolate at position `p/100 × (n−1)` of the
//!   ascending sort, so `p = 0` is the minimum and `p = 100` the maximum.
//! - `std_dev` is the population deviation. Only the weighted variant applies
//!   a small-sample correction, based on the effective sample size.

use serde::Serialize;

const STRONG_TREND: f64 = 0.10;
const MODERATE_TREND: f64 = 0.05;
const HIGH_STABILITY_CV: f64 = 0.30;
const MODERATE_STABILITY_CV: f64 = 0.50;
const MIN_OUTLIER_POINTS: usize = 4;

/// Percentile of an unsorted slice.
pub fn percentile(values: &[f64], percentile: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, percentile)
}

/// Percentile of a slice already sorted in ascending order.
pub fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return 0.0;
    };
    let position = (percentile.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted_values[lower];
    }
    let weight = position - lower as f64;
    sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Weighted mean. Weights need not sum to one.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().take(values.len()).sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }
    values
        .iter()
        .zip(weights)
        .map(|(value, weight)| value * weight)
        .sum::<f64>()
        / total
}

/// Weighted standard deviation with an effective-sample-size correction.
///
/// With normalized weights `wᵢ`, the effective sample size is `1 / Σwᵢ²`;
/// when it exceeds one the variance is scaled by `n_eff / (n_eff − 1)`.
/// Uniform weights therefore reproduce the sample standard deviation.
pub fn weighted_std_dev(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().take(values.len()).sum();
    if values.len() < 2 || total <= 0.0 {
        return 0.0;
    }
    let mean = weighted_mean(values, weights);
    let mut variance = 0.0;
    let mut sum_of_squared_weights = 0.0;
    for (value, weight) in values.iter().zip(weights) {
        let normalized = weight / total;
        variance += normalized * (value - mean).powi(2);
        sum_of_squared_weights += normalized * normalized;
    }
    let effective_size = 1.0 / sum_of_squared_weights;
    if effective_size > 1.0 {
        variance *= effective_size / (effective_size - 1.0);
    }
    variance.sqrt()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// Quartiles by the split-halves method. The median element of an odd-length
/// sequence belongs to neither half; each quartile is the element at the
/// midpoint index of its half.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let mid = n / 2;
    let median = if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    let lower = &sorted[..mid];
    let upper = &sorted[n - mid..];
    let q1 = lower.get(lower.len() / 2).copied().unwrap_or(median);
    let q3 = upper.get(upper.len() / 2).copied().unwrap_or(median);
    Some(Quartiles { q1, median, q3 })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierSplit {
    /// Input values that survived, in their original order.
    pub kept: Vec<f64>,
    pub outliers: Vec<f64>,
}

/// Flags unusually low values: below half the median and no higher than Q1.
///
/// High spikes are never flagged. Fewer than four points are returned
/// unchanged.
pub fn detect_low_outliers(values: &[f64]) -> OutlierSplit {
    let unchanged = OutlierSplit {
        kept: values.to_vec(),
        outliers: Vec::new(),
    };
    if values.len() < MIN_OUTLIER_POINTS {
        return unchanged;
    }
    let Some(quartiles) = quartiles(values) else {
        return unchanged;
    };
    let threshold = quartiles.median * 0.5;
    let (outliers, kept): (Vec<f64>, Vec<f64>) = values
        .iter()
        .partition(|value| **value < threshold && **value <= quartiles.q1);
    OutlierSplit { kept, outliers }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Strong,
    Moderate,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub slope: f64,
    pub relative_change: f64,
    pub direction: TrendDirection,
    pub strength: TrendStrength,
}

/// Least-squares slope of the values against their 1-based sprint index.
pub fn detect_trend(values: &[f64]) -> Trend {
    let n = values.len();
    let mut slope = 0.0;
    if n >= 2 {
        let x_mean = (n as f64 + 1.0) / 2.0;
        let y_mean = mean(values);
        let mut covariance = 0.0;
        let mut x_variance = 0.0;
        for (index, value) in values.iter().enumerate() {
            let dx = (index + 1) as f64 - x_mean;
            covariance += dx * (value - y_mean);
            x_variance += dx * dx;
        }
        slope = covariance / x_variance;
    }

    let average = mean(values);
    let relative_change = if average == 0.0 { 0.0 } else { slope / average };
    let strength = if relative_change.abs() >= STRONG_TREND {
        TrendStrength::Strong
    } else if relative_change.abs() >= MODERATE_TREND {
        TrendStrength::Moderate
    } else {
        TrendStrength::None
    };
    let direction = match strength {
        TrendStrength::None => TrendDirection::Stable,
        _ if relative_change > 0.0 => TrendDirection::Up,
        _ => TrendDirection::Down,
    };

    Trend {
        slope,
        relative_change,
        direction,
        strength,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityLevel {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stability {
    pub coefficient_of_variation: f64,
    pub level: StabilityLevel,
}

/// Stability from the coefficient of variation. A zero mean is low stability.
pub fn classify_stability(values: &[f64]) -> Stability {
    let average = mean(values);
    if average == 0.0 {
        return Stability {
            coefficient_of_variation: 0.0,
            level: StabilityLevel::Low,
        };
    }
    let cv = std_dev(values) / average;
    let level = if cv < HIGH_STABILITY_CV {
        StabilityLevel::High
    } else if cv < MODERATE_STABILITY_CV {
        StabilityLevel::Moderate
    } else {
        StabilityLevel::Low
    };
    Stability {
        coefficient_of_variation: cv,
        level,
    }
}
