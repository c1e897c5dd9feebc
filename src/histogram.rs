// 📶 Histogram Binner - fixed bin count, derived bin width
//
// Bins are returned as structured upper edges; formatting them into
// display labels (units, locale) is left to the caller.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Upper edge of each bin, rounded to 2 decimals
    pub upper_edges: Vec<f64>,

    /// Samples per bin
    pub frequencies: Vec<f64>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.upper_edges.len()
    }

    pub fn total(&self) -> f64 {
        self.frequencies.iter().sum()
    }

    /// Display labels such as `"3.50 days"`
    pub fn labels(&self, unit: &str) -> Vec<String> {
        self.upper_edges
            .iter()
            .map(|edge| {
                if unit.is_empty() {
                    format!("{:.2}", edge)
                } else {
                    format!("{:.2} {}", edge, unit)
                }
            })
            .collect()
    }
}

/// Bin `samples` into `bin_count` equal-width bins between min and max.
///
/// An empty sample yields one `0.0` bin whose frequency is `item_count`,
/// i.e. every considered item is reported at the zero default.
/// A zero `bin_count` is a caller bug and is rejected.
pub fn histogram(samples: &[f64], bin_count: usize, item_count: usize) -> FlowResult<Histogram> {
    if bin_count == 0 {
        return Err(FlowError::InvalidBinCount(bin_count));
    }

    if samples.is_empty() {
        return Ok(Histogram {
            upper_edges: vec![0.0],
            frequencies: vec![item_count as f64],
        });
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bin_count as f64;

    let upper_edges = (1..=bin_count)
        .map(|i| round2(min + width * i as f64))
        .collect();

    let mut frequencies = vec![0.0; bin_count];
    for &value in samples {
        frequencies[bin_index(value, min, width, bin_count)] += 1.0;
    }

    tracing::debug!(samples = samples.len(), bin_count, min, max, "binned histogram");

    Ok(Histogram {
        upper_edges,
        frequencies,
    })
}

fn bin_index(value: f64, min: f64, width: f64, bin_count: usize) -> usize {
    if width <= 0.0 || !width.is_finite() {
        return 0;
    }
    let raw = ((value - min) / width).floor();
    if raw.is_nan() || raw < 0.0 {
        0
    } else {
        (raw as usize).min(bin_count - 1)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// TESTS
// ============================================================================
