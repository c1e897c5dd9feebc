// 🛠️ Operational Report - day-to-day flow of one scoped dataset
//
// Burnup, throughput, WIP, queue/touch time, flow efficiency, blocked time,
// CFD lines and lead-time statistics on the requested axis.

use crate::aggregator::{work_item_events, Weight, WorkItemEvent};
use crate::burnup::burnup_to_final_scope;
use crate::cfd::{cumulative_flow, delivered_line};
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::delivery::{control_chart, throughput, work_in_progress};
use crate::error::FlowResult;
use crate::flow_efficiency::{blocked_time, queue_touch, stage_intervals};
use crate::histogram::histogram;
use crate::statistics::SampleSummary;

use super::{dataset_scope_events, ChartData, ChartRequest, ChartSeriesProvider, ReportKind};

pub struct OperationalReport<'a> {
    dataset: &'a Dataset,
    config: &'a EngineConfig,
}

impl<'a> OperationalReport<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a EngineConfig) -> Self {
        OperationalReport { dataset, config }
    }
}

impl ChartSeriesProvider for OperationalReport<'_> {
    fn kind(&self) -> ReportKind {
        ReportKind::Operational
    }

    fn build(&self, request: &ChartRequest) -> FlowResult<ChartData> {
        let axis = request.axis();
        let items = &self.dataset.work_items;
        let mut chart = ChartData::new(self.kind(), &axis);

        // Burnup
        let completions = work_item_events(items, WorkItemEvent::Completed, Weight::Count);
        let burnup = burnup_to_final_scope(
            &axis,
            &dataset_scope_events(self.dataset),
            &completions,
            request.today(),
        );
        chart.push_scalar("percent_complete", burnup.percent_complete());
        chart.push_series("scope", burnup.scope);
        chart.push_series("delivered", burnup.current);
        chart.push_series("ideal", burnup.ideal);

        // Flow
        chart.push_series("throughput", throughput(&axis, items));
        chart.push_series("wip", work_in_progress(&axis, items));

        let intervals = stage_intervals(&self.dataset.transitions, &self.dataset.stages);
        let flow = queue_touch(&axis, &intervals, request.now);
        chart.push_scalar("flow_efficiency", flow.overall_efficiency());
        chart.push_series("queue_hours", flow.queue_hours);
        chart.push_series("touch_hours", flow.touch_hours);
        chart.push_series("flow_efficiency", flow.flow_efficiency);

        let blocked = blocked_time(&axis, &self.dataset.blocks, request.now);
        chart.push_scalar(
            "blocks_active",
            self.dataset.blocks.iter().filter(|block| block.is_still_blocking()).count() as f64,
        );
        chart.push_series("blocked_hours", blocked.blocked_hours);
        chart.push_series("blocks_opened", blocked.blocks_opened);

        // End-point stages count as delivered on the CFD
        let lines = cumulative_flow(&axis, &self.dataset.stages, &self.dataset.transitions);
        chart.push_series("stage_delivered", delivered_line(&lines, axis.len()));
        for line in lines {
            chart.push_series(format!("cfd:{}", line.stage_id), line.data);
        }

        // Lead time
        let control = control_chart(&axis, items, &self.config.percentiles);
        let lead_times = control.lead_times();
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
