// 💵 Financial Aggregator - monthly roll-up of income and expenses
//
// Per month (chronological):
//   income_total, expenses_total, financial_result
//   dispersion of income/expenses over a trailing window of months
//   income_per_hour / cost_per_hour against delivered hours
//   tail threshold = mean(cost_per_hour) + k * std_dev(cost_per_hour) over the window
//   accumulated_financial_result = running sum of financial_result
//
// Rates with a zero denominator resolve to 0.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::FinancialConfig;
use crate::entities::{ConsolidatedMonth, FinancialEntry, WorkItem};
use crate::period_axis::end_of_month;
use crate::statistics::{mean, population_standard_deviation};

// ============================================================================
// MONTHLY RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFinancials {
    /// Last day of the month
    pub month: NaiveDate,

    pub income_total: f64,
    pub expenses_total: f64,
    pub income_std_dev: f64,
    pub expenses_std_dev: f64,

    pub delivered_hours: f64,
    pub throughput: f64,

    pub income_per_hour: f64,
    pub cost_per_hour: f64,
    pub cost_per_item: f64,

    pub tail_event_threshold: f64,
    pub is_tail_event: bool,

    pub financial_result: f64,
    pub accumulated_financial_result: f64,
}

/// Hours and items delivered in one month
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveredMonth {
    pub hours: f64,
    pub throughput: f64,
}

/// Delivered effort and throughput keyed by month end, from completion dates
pub fn delivered_by_month(items: &[WorkItem]) -> BTreeMap<NaiveDate, DeliveredMonth> {
    let mut delivered: BTreeMap<NaiveDate, DeliveredMonth> = BTreeMap::new();
    for item in items {
        if let Some(completed_at) = item.completed_at {
            let month = delivered
                .entry(end_of_month(completed_at.date_naive()))
                .or_default();
            month.hours += item.total_effort();
            month.throughput += 1.0;
        }
    }
    delivered
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// ============================================================================
// FINANCIAL AGGREGATOR
// ============================================================================

pub struct FinancialAggregator {
    config: FinancialConfig,

    /// Precomputed months that override derived delivery figures
    consolidations: BTreeMap<NaiveDate, ConsolidatedMonth>,
}

impl FinancialAggregator {
    pub fn new(config: FinancialConfig) -> Self {
        FinancialAggregator {
            config,
            consolidations: BTreeMap::new(),
        }
    }

    pub fn with_consolidations(mut self, consolidations: &[ConsolidatedMonth]) -> Self {
        for consolidation in consolidations {
            self.consolidations
                .insert(end_of_month(consolidation.month), consolidation.clone());
        }
        self
    }

    /// Aggregate `entries` per month, rating them against work delivered by `items`
    pub fn aggregate(&self, entries: &[FinancialEntry], items: &[WorkItem]) -> Vec<MonthlyFinancials> {
        let mut totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for entry in entries {
            let month = totals.entry(end_of_month(entry.period_date)).or_insert((0.0, 0.0));
            month.0 += entry.income;
            month.1 += entry.expense;
        }

        let derived = delivered_by_month(items);
        let window = self.config.trailing_window.max(1);

        let mut incomes = Vec::with_capacity(totals.len());
        let mut expenses = Vec::with_capacity(totals.len());
        let mut costs_per_hour = Vec::with_capacity(totals.len());
        let mut accumulated = 0.0;
        let mut report = Vec::with_capacity(totals.len());

        for (month, (income_total, expenses_total)) in totals {
            let delivered = self.delivered_in(month, &derived);
            let cost_per_hour = ratio(expenses_total, delivered.hours);

            incomes.push(income_total);
            expenses.push(expenses_total);
            costs_per_hour.push(cost_per_hour);

            let from = incomes.len().saturating_sub(window);
            let cost_window = &costs_per_hour[from..];
            let tail_event_threshold = mean(cost_window)
                + self.config.tail_event_k * population_standard_deviation(cost_window);

            let financial_result = income_total - expenses_total;
            accumulated += financial_result;

            report.push(MonthlyFinancials {
                month,
                income_total,
                expenses_total,
                income_std_dev: population_standard_deviation(&incomes[from..]),
                expenses_std_dev: population_standard_deviation(&expenses[from..]),
                delivered_hours: delivered.hours,
                throughput: delivered.throughput,
                income_per_hour: ratio(income_total, delivered.hours),
                cost_per_hour,
                cost_per_item: ratio(expenses_total, delivered.throughput),
                tail_event_threshold,
                is_tail_event: cost_per_hour > tail_event_threshold,
                financial_result,
                accumulated_financial_result: accumulated,
            });
        }

        tracing::debug!(
            entries = entries.len(),
            months = report.len(),
            consolidated = self.consolidations.len(),
            "aggregated financial entries"
        );

        report
    }

    fn delivered_in(&self, month: NaiveDate, derived: &BTreeMap<NaiveDate, DeliveredMonth>) -> DeliveredMonth {
        let fallback = derived.get(&month).copied().unwrap_or_default();
        match self.consolidations.get(&month) {
            Some(snapshot) => DeliveredMonth {
                hours: snapshot.delivered_hours,
                throughput: snapshot.throughput.unwrap_or(fallback.throughput),
            },
            None => fallback,
        }
    }
}

impl Default for FinancialAggregator {
    fn default() -> Self {
        Self::new(FinancialConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn delivered_item(m: u32, d: u32, hours: f64) -> WorkItem {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        WorkItem::new(created)
            .with_completion(Utc.with_ymd_and_hms(2024, m, d, 12, 0, 0).unwrap())
            .with_effort(0.0, hours)
    }

    fn aggregator(window: usize, k: f64) -> FinancialAggregator {
        FinancialAggregator::new(FinancialConfig {
            trailing_window: window,
            tail_event_k: k,
        })
    }

    #[test]
    fn test_groups_entries_by_month_in_order() {
        let entries = vec![
            FinancialEntry::new(date(2024, 2, 10), 100.0, 40.0),
            FinancialEntry::new(date(2024, 1, 5), 50.0, 80.0),
            FinancialEntry::new(date(2024, 2, 20), 20.0, 0.0),
        ];

        let report = aggregator(3, 2.0).aggregate(&entries, &[]);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].month, date(2024, 1, 31));
        assert_eq!(report[0].financial_result, -30.0);
        assert_eq!(report[1].month, date(2024, 2, 29));
        assert_eq!(report[1].income_total, 120.0);
        assert_eq!(report[1].expenses_total, 40.0);
        assert_eq!(report[1].accumulated_financial_result, 50.0);
    }

    #[test]
    fn test_rates_against_delivered_hours() {
        let entries = vec![FinancialEntry::new(date(2024, 3, 1), 1000.0, 500.0)];
        let items = vec![
            delivered_item(3, 4, 10.0),
            delivered_item(3, 20, 15.0),
            delivered_item(4, 2, 99.0),
        ];

        let month = &aggregator(3, 2.0).aggregate(&entries, &items)[0];

        assert_eq!(month.delivered_hours, 25.0);
        assert_eq!(month.throughput, 2.0);
        assert_eq!(month.income_per_hour, 40.0);
        assert_eq!(month.cost_per_hour, 20.0);
        assert_eq!(month.cost_per_item, 250.0);
    }

    #[test]
    fn test_zero_hours_yield_zero_rates() {
        let entries = vec![FinancialEntry::new(date(2024, 3, 1), 1000.0, 500.0)];
        let month = &aggregator(3, 2.0).aggregate(&entries, &[])[0];

        assert_eq!(month.income_per_hour, 0.0);
        assert_eq!(month.cost_per_hour, 0.0);
        assert_eq!(month.cost_per_item, 0.0);
        assert!(!month.is_tail_event);
    }

    #[test]
    fn test_trailing_window_dispersion() {
        let entries = vec![
            FinancialEntry::new(date(2024, 1, 1), 10.0, 0.0),
            FinancialEntry::new(date(2024, 2, 1), 20.0, 0.0),
            FinancialEntry::new(date(2024, 3, 1), 30.0, 0.0),
        ];

        let report = aggregator(2, 2.0).aggregate(&entries, &[]);

        assert_eq!(report[0].income_std_dev, 0.0);
        assert_eq!(report[1].income_std_dev, 5.0); // [10, 20]
        assert_eq!(report[2].income_std_dev, 5.0); // [20, 30]
    }

    #[test]
    fn test_tail_event_threshold() {
        // cost per hour: 10, 10, 40 over 10 hours each
        let entries = vec![
            FinancialEntry::new(date(2024, 1, 1), 0.0, 100.0),
            FinancialEntry::new(date(2024, 2, 1), 0.0, 100.0),
            FinancialEntry::new(date(2024, 3, 1), 0.0, 400.0),
        ];
        let items = vec![
            delivered_item(1, 10, 10.0),
            delivered_item(2, 10, 10.0),
            delivered_item(3, 10, 10.0),
        ];

        let report = aggregator(3, 1.0).aggregate(&entries, &items);
        let march = &report[2];

        // mean 20, population std dev sqrt(200)
        let expected = 20.0 + 200f64.sqrt();
        assert!((march.tail_event_threshold - expected).abs() < 1e-9);
        assert!(march.is_tail_event);
        assert!(!report[1].is_tail_event);
    }

    #[test]
    fn test_consolidation_overrides_derived_hours() {
        let entries = vec![FinancialEntry::new(date(2024, 3, 1), 800.0, 400.0)];
        let items = vec![delivered_item(3, 4, 10.0)];
        let consolidations = vec![ConsolidatedMonth {
            month: date(2024, 3, 15),
            delivered_hours: 40.0,
            throughput: None,
        }];

        let month = &aggregator(3, 2.0)
            .with_consolidations(&consolidations)
            .aggregate(&entries, &items)[0];

        assert_eq!(month.delivered_hours, 40.0);
        assert_eq!(month.throughput, 1.0);
        assert_eq!(month.cost_per_hour, 10.0);
    }

    #[test]
    fn test_no_entries() {
        assert!(FinancialAggregator::default().aggregate(&[], &[]).is_empty());
    }
}
