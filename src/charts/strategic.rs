// 🧭 Strategic Report - financial health and delivery on a monthly axis
//
// Financial figures are monthly by nature, so this report always renders
// month periods over the requested range whatever granularity was asked.

use crate::aggregator::{cumulative, cumulative_with_baseline};
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::delivery::throughput;
use crate::error::FlowResult;
use crate::financial::{FinancialAggregator, MonthlyFinancials};
use crate::period_axis::{axis, Granularity};

use super::{dataset_scope_events, ChartData, ChartRequest, ChartSeriesProvider, ReportKind};

pub struct StrategicReport<'a> {
    dataset: &'a Dataset,
    config: &'a EngineConfig,
}

impl<'a> StrategicReport<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a EngineConfig) -> Self {
        StrategicReport { dataset, config }
    }
}

impl ChartSeriesProvider for StrategicReport<'_> {
    fn kind(&self) -> ReportKind {
        ReportKind::Strategic
    }

    fn build(&self, request: &ChartRequest) -> FlowResult<ChartData> {
        let months = axis(request.start_date, request.end_date, Granularity::Month);
        let mut chart = ChartData::new(self.kind(), &months);

        // Aggregate over every entry so trailing windows see the months before the range
        let report = FinancialAggregator::new(self.config.financial.clone())
            .with_consolidations(&self.dataset.consolidations)
            .aggregate(&self.dataset.financial_entries, &self.dataset.work_items);

        let mut income = vec![0.0; months.len()];
        let mut expenses = vec![0.0; months.len()];
        let mut result = vec![0.0; months.len()];
        let mut income_per_hour = vec![0.0; months.len()];
        let mut cost_per_hour = vec![0.0; months.len()];
        let mut tail_threshold = vec![0.0; months.len()];
        let mut tail_events = 0.0;

        for month in &report {
            if let Some(index) = months.index_of(month.month) {
                income[index] = month.income_total;
                expenses[index] = month.expenses_total;
                result[index] = month.financial_result;
                income_per_hour[index] = month.income_per_hour;
                cost_per_hour[index] = month.cost_per_hour;
                tail_threshold[index] = month.tail_event_threshold;
                if month.is_tail_event {
                    tail_events += 1.0;
                }
            }
        }

        chart.push_scalar("total_income", income.iter().sum());
        chart.push_scalar("total_expenses", expenses.iter().sum());
        chart.push_scalar("tail_events", tail_events);

        chart.push_series("accumulated_financial_result", accumulated_on_axis(&report, months.boundaries()));
        chart.push_series("income", income);
        chart.push_series("expenses", expenses);
        chart.push_series("financial_result", result);
        chart.push_series("income_per_hour", income_per_hour);
        chart.push_series("cost_per_hour", cost_per_hour);
        chart.push_series("tail_event_threshold", tail_threshold);

        // Delivery across every project
        let delivered = throughput(&months, &self.dataset.work_items);
        chart.push_series("delivered_accumulated", cumulative(&delivered));
        chart.push_series("throughput", delivered);
        chart.push_series(
            "scope",
            cumulative_with_baseline(&dataset_scope_events(self.dataset), &months),
        );

        Ok(chart)
    }
}

/// Running financial result at each month end, carried over months without entries
fn accumulated_on_axis(report: &[MonthlyFinancials], boundaries: &[chrono::NaiveDate]) -> Vec<f64> {
    boundaries
        .iter()
        .map(|boundary| {
            report
                .iter()
                .take_while(|month| month.month <= *boundary)
                .last()
                .map_or(0.0, |month| month.accumulated_financial_result)
        })
        .collect()
}
