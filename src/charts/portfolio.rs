// 🗂️ Portfolio Report - every project on one axis plus portfolio totals

use crate::aggregator::{cumulative_with_baseline, scope_events, work_item_events, Weight, WorkItemEvent};
use crate::dataset::Dataset;
use crate::delivery::throughput;
use crate::error::FlowResult;

use super::{ChartData, ChartRequest, ChartSeriesProvider, ReportKind};

pub struct PortfolioReport<'a> {
    dataset: &'a Dataset,
}

impl<'a> PortfolioReport<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        PortfolioReport { dataset }
    }
}

impl ChartSeriesProvider for PortfolioReport<'_> {
    fn kind(&self) -> ReportKind {
        ReportKind::Portfolio
    }

    fn build(&self, request: &ChartRequest) -> FlowResult<ChartData> {
        let axis = request.axis();
        let mut chart = ChartData::new(self.kind(), &axis);
        let items = &self.dataset.work_items;

        let mut total_scope = vec![0.0; axis.len()];
        let mut total_delivered = vec![0.0; axis.len()];

        for project in &self.dataset.projects {
            let scope = cumulative_with_baseline(&scope_events(project, items), &axis);
            let delivered = cumulative_with_baseline(
                &work_item_events(project.items(items), WorkItemEvent::Completed, Weight::Count),
                &axis,
            );

            for (total, value) in total_scope.iter_mut().zip(&scope) {
                *total += value;
            }
            for (total, value) in total_delivered.iter_mut().zip(&delivered) {
                *total += value;
            }

            chart.push_series(format!("{}:scope", project.id), scope);
            chart.push_series(format!("{}:delivered", project.id), delivered);
        }

        let final_scope = total_scope.last().copied().unwrap_or(0.0);
        let final_delivered = total_delivered.last().copied().unwrap_or(0.0);
        chart.push_scalar("projects", self.dataset.projects.len() as f64);
        chart.push_scalar(
            "percent_complete",
            if final_scope > 0.0 {
                final_delivered / final_scope * 100.0
            } else {
                0.0
            },
        );

        chart.push_series("portfolio:scope", total_scope);
        chart.push_series("portfolio:delivered", total_delivered);
        chart.push_series("portfolio:throughput", throughput(&axis, items));

        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Project, WorkItem};
    use crate::period_axis::Granularity;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_portfolio_totals() {
        let at = |m, d| Utc.with_ymd_and_hms(2024, m, d, 9, 0, 0).unwrap();
        let dataset = Dataset {
            projects: vec![
                Project::new("p1", "Checkout", date(1, 1), date(3, 31)).with_initial_scope(1),
                Project::new("p2", "Search", date(2, 1), date(3, 31)),
            ],
            work_items: vec![
                WorkItem::new(at(1, 10)).with_project("p1").with_completion(at(2, 10)),
                WorkItem::new(at(2, 10)).with_project("p2").with_completion(at(3, 10)),
                WorkItem::new(at(3, 10)).with_project("p2"),
            ],
            ..Dataset::default()
        };
        let request = ChartRequest::new(date(1, 1), date(3, 31), Granularity::Month, at(4, 1));

        let chart = PortfolioReport::new(&dataset).build(&request).unwrap();

        assert_eq!(chart.series("p1:scope"), Some(&[2.0, 2.0, 2.0][..]));
        assert_eq!(chart.series("p2:scope"), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(chart.series("portfolio:scope"), Some(&[2.0, 3.0, 4.0][..]));
        assert_eq!(chart.series("portfolio:delivered"), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(chart.series("portfolio:throughput"), Some(&[0.0, 1.0, 1.0][..]));
        assert_eq!(chart.scalar("percent_complete"), Some(50.0));
        assert_eq!(chart.scalar("projects"), Some(2.0));
    }

    #[test]
    fn test_portfolio_without_projects() {
        let dataset = Dataset::default();
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let request = ChartRequest::new(date(1, 1), date(2, 28), Granularity::Month, now);

        let chart = PortfolioReport::new(&dataset).build(&request).unwrap();

        assert_eq!(chart.series("portfolio:scope"), Some(&[0.0, 0.0][..]));
        assert_eq!(chart.scalar("percent_complete"), Some(0.0));
    }
}
