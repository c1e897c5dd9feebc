// 🚨 Engine Errors - Contract violations only
//
// Empty data, out-of-range dates and zero denominators are NOT errors here:
// every component degrades to empty/zero series instead. The variants below
// signal a caller bug and are returned as soon as they are detected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    /// Granularity string was not one of day/week/month
    #[error("invalid granularity: {0:?} (expected day, week or month)")]
    InvalidGranularity(String),

    /// Histogram requested with zero bins
    #[error("invalid histogram bin count: {0}")]
    InvalidBinCount(usize),

    /// Report kind string did not match any chart provider
    #[error("unknown report kind: {0:?}")]
    UnknownReport(String),

    /// Engine configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type FlowResult<T> = std::result::Result<T, FlowError>;
