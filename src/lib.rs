// Flow Metrics - Core Library
// Exposes the analytics engine for use in CLI, API server, and tests

pub mod error;
pub mod config;
pub mod entities;          // Read-only domain records
pub mod period_axis;       // Period Axis Generator
pub mod statistics;        // Percentile & Dispersion Calculator
pub mod histogram;         // Histogram Binner
pub mod aggregator;        // Bucketed Event Aggregator
pub mod burnup;            // Burnup Calculator
pub mod flow_efficiency;   // Queue/Touch time + blocked time
pub mod cfd;               // Cumulative Flow Diagram Builder
pub mod financial;         // Financial Aggregator
pub mod delivery;          // Lead time, throughput, WIP
pub mod charts;            // Chart Adapter Facade
pub mod dataset;           // JSON/CSV ingestion for the binaries

// Re-export commonly used types
pub use error::{FlowError, FlowResult};
pub use config::{EngineConfig, FinancialConfig};
pub use entities::{
    Block, ClassOfService, ConsolidatedMonth, FinancialEntry, IntervalEnd, Project,
    Stage, StageKind, StageTransition, Stream, WorkItem, WorkItemType,
};
pub use period_axis::{axis, axis_between, end_of_month, end_of_week, Granularity, PeriodAxis};
pub use statistics::{
    mean, percentile, population_standard_deviation, standard_deviation, PercentileValue,
    SampleSummary,
};
pub use histogram::{histogram, Histogram};
pub use aggregator::{
    cumulative, cumulative_with_baseline, per_period, per_period_with_baseline, DatedEvent,
    Weight, WorkItemEvent,
};
pub use burnup::{burnup, burnup_to_final_scope, Burnup};
pub use flow_efficiency::{
    blocked_time, queue_touch, stage_intervals, BlockedTimeSeries, QueueTouchSeries,
    TimedInterval,
};
pub use cfd::{cumulative_flow, CfdLine};
pub use financial::{FinancialAggregator, MonthlyFinancials};
pub use delivery::{control_chart, lead_time_days, ControlChart};
pub use charts::{
    build_report, provider_for, ChartData, ChartRequest, ChartSeriesProvider, NamedSeries,
    ReportKind,
};
pub use dataset::{load_work_items_csv, Dataset};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
