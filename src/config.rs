// ⚙️ Engine Configuration - tunables as data
//
// Loaded from JSON; any missing field falls back to its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{FlowError, FlowResult};

// ============================================================================
// FINANCIAL CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    /// Months (current included) used for dispersion and tail threshold
    pub trailing_window: usize,

    /// Standard deviations above the mean marking a tail event
    pub tail_event_k: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        FinancialConfig {
            trailing_window: 3,
            tail_event_k: 2.0,
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bins of every histogram
    pub histogram_bins: usize,

    /// Percentile levels reported for lead times, in [0, 100]
    pub percentiles: Vec<f64>,

    pub financial: FinancialConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            histogram_bins: 3,
            percentiles: vec![50.0, 80.0, 95.0],
            financial: FinancialConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: EngineConfig = serde_json::from_str(&content)
            .context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FlowResult<()> {
        if self.histogram_bins == 0 {
            return Err(FlowError::InvalidBinCount(self.histogram_bins));
        }
        if let Some(level) = self
            .percentiles
            .iter()
            .find(|level| !(0.0..=100.0).contains(*level))
        {
            return Err(FlowError::InvalidConfig(format!(
                "percentile {} outside 0..=100",
                level
            )));
        }
        if self.financial.trailing_window == 0 {
            return Err(FlowError::InvalidConfig(
                "financial.trailing_window must be at least 1".to_string(),
            ));
        }
        if !(self.financial.tail_event_k >= 0.0) {
            return Err(FlowError::InvalidConfig(
                "financial.tail_event_k must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
