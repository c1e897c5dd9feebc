// 👥 Team Report - delivery mix and effort of a team-scoped dataset

use crate::aggregator::{per_period, work_item_events, Weight, WorkItemEvent};
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::delivery::{control_chart, throughput_by_type, work_in_progress};
use crate::entities::WorkItemType;
use crate::error::FlowResult;
use crate::flow_efficiency::{queue_touch, stage_intervals};
use crate::histogram::histogram;
use crate::statistics::SampleSummary;

use super::{ChartData, ChartRequest, ChartSeriesProvider, ReportKind};

pub struct TeamReport<'a> {
    dataset: &'a Dataset,
    config: &'a EngineConfig,
}

impl<'a> TeamReport<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a EngineConfig) -> Self {
        TeamReport { dataset, config }
    }
}

impl ChartSeriesProvider for TeamReport<'_> {
    fn kind(&self) -> ReportKind {
        ReportKind::Team
    }

    fn build(&self, request: &ChartRequest) -> FlowResult<ChartData> {
        let axis = request.axis();
        let items = &self.dataset.work_items;
        let mut chart = ChartData::new(self.kind(), &axis);

        for item_type in WorkItemType::all() {
            chart.push_series(
                format!("throughput:{}", item_type.as_str()),
                throughput_by_type(&axis, items, item_type),
            );
        }

        // Effort is booked when the item is delivered
        for (name, weight) in [
            ("upstream_hours", Weight::UpstreamEffort),
            ("downstream_hours", Weight::DownstreamEffort),
        ] {
            chart.push_series(
                name,
                per_period(&work_item_events(items, WorkItemEvent::Completed, weight), &axis),
            );
        }

        chart.push_series("wip", work_in_progress(&axis, items));

        let intervals = stage_intervals(&self.dataset.transitions, &self.dataset.stages);
        let flow = queue_touch(&axis, &intervals, request.now);
        chart.push_scalar("flow_efficiency", flow.overall_efficiency());
        chart.push_series("flow_efficiency", flow.flow_efficiency);

        let lead_times = control_chart(&axis, items, &self.config.percentiles).lead_times();
        chart.push_summary(
            "lead_time",
            &SampleSummary::compute(&lead_times, &self.config.percentiles),
        );
        chart.push_histogram(
            "lead_time",
            histogram(&lead_times, self.config.histogram_bins, items.len())?,
        );

        Ok(chart)
    }
}
