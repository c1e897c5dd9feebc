// 🎯 Status Report - burnup per project
//
// One scope/delivered/ideal triple per project, named `<project_id>:<series>`,
// plus completion and deadline scalars.

use crate::aggregator::{scope_events, work_item_events, Weight, WorkItemEvent};
use crate::burnup::burnup_to_final_scope;
use crate::dataset::Dataset;
use crate::error::FlowResult;

use super::{ChartData, ChartRequest, ChartSeriesProvider, ReportKind};

pub struct StatusReport<'a> {
    dataset: &'a Dataset,
}

impl<'a> StatusReport<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        StatusReport { dataset }
    }
}

impl ChartSeriesProvider for StatusReport<'_> {
    fn kind(&self) -> ReportKind {
        ReportKind::Status
    }

    fn build(&self, request: &ChartRequest) -> FlowResult<ChartData> {
        let axis = request.axis();
        let mut chart = ChartData::new(self.kind(), &axis);
        let items = &self.dataset.work_items;

        for project in &self.dataset.projects {
            let completions = work_item_events(
                project.items(items),
                WorkItemEvent::Completed,
                Weight::Count,
            );
            let burnup = burnup_to_final_scope(
                &axis,
                &scope_events(project, items),
                &completions,
                request.today(),
            );

            let scope = project.total_scope(items);
            let delivered = completions.len() as f64;

            chart.push_scalar(format!("{}:percent_complete", project.id), burnup.percent_complete());
            chart.push_scalar(format!("{}:remaining", project.id), (scope - delivered).max(0.0));
            chart.push_scalar(
                format!("{}:days_to_deadline", project.id),
                (project.end_date - request.today()).num_days() as f64,
            );

            chart.push_series(format!("{}:scope", project.id), burnup.scope);
            chart.push_series(format!("{}:delivered", project.id), burnup.current);
            chart.push_series(format!("{}:ideal", project.id), burnup.ideal);
        }

        Ok(chart)
    }
}
