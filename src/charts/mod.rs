// 📈 Chart Adapter Facade - one provider per report kind
//
// Providers only compose the engine components: they build the axis from the
// request, feed entity-derived events into the calculators and name the
// resulting series. Series names are structured keys (`scope`,
// `cfd:<stage_id>`, `<project_id>:delivered`...); display strings belong to
// the rendering layer.

pub mod operational;
pub mod strategic;
pub mod status;
pub mod portfolio;
pub mod team;

pub use operational::OperationalReport;
pub use strategic::StrategicReport;
pub use status::StatusReport;
pub use portfolio::PortfolioReport;
pub use team::TeamReport;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::aggregator::{work_item_events, DatedEvent, Weight, WorkItemEvent};
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::error::{FlowError, FlowResult};
use crate::histogram::Histogram;
use crate::period_axis::{axis, Granularity, PeriodAxis};
use crate::statistics::SampleSummary;

// ============================================================================
// REPORT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Operational,
    Strategic,
    Status,
    Portfolio,
    Team,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Operational => "operational",
            ReportKind::Strategic => "strategic",
            ReportKind::Status => "status",
            ReportKind::Portfolio => "portfolio",
            ReportKind::Team => "team",
        }
    }

    pub fn all() -> [ReportKind; 5] {
        [
            ReportKind::Operational,
            ReportKind::Strategic,
            ReportKind::Status,
            ReportKind::Portfolio,
            ReportKind::Team,
        ]
    }
}

impl FromStr for ReportKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ReportKind::all()
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| FlowError::UnknownReport(s.to_string()))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// REQUEST / RESPONSE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub granularity: Granularity,

    /// Injected clock: open intervals and "rendered so far" cut-offs use it
    pub now: DateTime<Utc>,
}

impl ChartRequest {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        granularity: Granularity,
        now: DateTime<Utc>,
    ) -> Self {
        ChartRequest {
            start_date,
            end_date,
            granularity,
            now,
        }
    }

    pub fn axis(&self) -> PeriodAxis {
        axis(self.start_date, self.end_date, self.granularity)
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub report: ReportKind,
    pub labels: Vec<String>,
    pub series: Vec<NamedSeries>,
    pub scalars: BTreeMap<String, f64>,
    pub histograms: BTreeMap<String, Histogram>,
}

impl ChartData {
    pub fn new(report: ReportKind, axis: &PeriodAxis) -> Self {
        ChartData {
            report,
            labels: axis.labels(),
            series: Vec::new(),
            scalars: BTreeMap::new(),
            histograms: BTreeMap::new(),
        }
    }

    pub fn push_series(&mut self, name: impl Into<String>, data: Vec<f64>) {
        self.series.push(NamedSeries {
            name: name.into(),
            data,
        });
    }

    pub fn push_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.scalars.insert(name.into(), value);
    }

    pub fn push_histogram(&mut self, name: impl Into<String>, histogram: Histogram) {
        self.histograms.insert(name.into(), histogram);
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|series| series.name == name)
            .map(|series| series.data.as_slice())
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    /// Percentile scalars named `<prefix>_p<level>` plus mean and count
    pub(crate) fn push_summary(&mut self, prefix: &str, summary: &SampleSummary) {
        for level in &summary.percentiles {
            self.push_scalar(format!("{}_p{}", prefix, level.percentile), level.value);
        }
        self.push_scalar(format!("{}_mean", prefix), summary.mean);
        self.push_scalar(format!("{}_count", prefix), summary.count as f64);
    }
}

// ============================================================================
// PROVIDER
// ============================================================================

pub trait ChartSeriesProvider {
    fn kind(&self) -> ReportKind;

    fn build(&self, request: &ChartRequest) -> FlowResult<ChartData>;
}

/// Provider for `kind` over an already-scoped dataset
pub fn provider_for<'a>(
    kind: ReportKind,
    dataset: &'a Dataset,
    config: &'a EngineConfig,
) -> Box<dyn ChartSeriesProvider + 'a> {
    match kind {
        ReportKind::Operational => Box::new(OperationalReport::new(dataset, config)),
        ReportKind::Strategic => Box::new(StrategicReport::new(dataset, config)),
        ReportKind::Status => Box::new(StatusReport::new(dataset)),
        ReportKind::Portfolio => Box::new(PortfolioReport::new(dataset)),
        ReportKind::Team => Box::new(TeamReport::new(dataset, config)),
    }
}

pub fn build_report(
    kind: ReportKind,
    dataset: &Dataset,
    config: &EngineConfig,
    request: &ChartRequest,
) -> FlowResult<ChartData> {
    let chart = provider_for(kind, dataset, config).build(request)?;
    tracing::debug!(
        report = %kind,
        periods = chart.labels.len(),
        series = chart.series.len(),
        "built report"
    );
    Ok(chart)
}

/// Initial scope of every project plus one event per registered work item
pub(crate) fn dataset_scope_events(dataset: &Dataset) -> Vec<DatedEvent> {
    let mut events: Vec<DatedEvent> = dataset
        .projects
        .iter()
        .filter(|project| project.initial_scope > 0)
        .map(|project| DatedEvent::new(project.start_date, project.initial_scope as f64))
        .collect();
    events.extend(work_item_events(
        &dataset.work_items,
        WorkItemEvent::Created,
        Weight::Count,
    ));
    events
}
