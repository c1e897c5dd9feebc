// 📊 Percentile & Dispersion Calculator
//
// Every function degrades to 0.0 on empty input so charts render a flat
// zero line instead of failing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Arithmetic mean. 0.0 for an empty sample.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is clamped to `[0, 100]`. Rank is `p / 100 * (n - 1)` over the
/// ascending sample.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let fraction = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Population standard deviation (divides by n). 0.0 for fewer than two samples.
pub fn population_standard_deviation(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let avg = mean(samples);
    let variance =
        samples.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (divides by n - 1). 0.0 for fewer than two samples.
pub fn standard_deviation(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let avg = mean(samples);
    let variance =
        samples.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    variance.sqrt()
}

// ============================================================================
// SUMMARY
// ============================================================================

/// One requested percentile level and its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub percentile: f64,
    pub value: f64,
}

/// Scalar statistics over one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub standard_deviation: f64,
    pub percentiles: Vec<PercentileValue>,
}

impl SampleSummary {
    pub fn compute(samples: &[f64], levels: &[f64]) -> Self {
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        SampleSummary {
            count: samples.len(),
            min: if samples.is_empty() { 0.0 } else { min },
            max: if samples.is_empty() { 0.0 } else { max },
            mean: mean(samples),
            standard_deviation: population_standard_deviation(samples),
            percentiles: levels
                .iter()
                .map(|&level| PercentileValue {
                    percentile: level,
                    value: percentile(samples, level),
                })
                .collect(),
        }
    }

    pub fn percentile(&self, level: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| (p.percentile - level).abs() < f64::EPSILON)
            .map(|p| p.value)
    }
}

// ============================================================================
// TESTS
// ============================================================================
