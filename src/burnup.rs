// 🔥 Burnup Calculator - scope vs completion with an ideal line
//
//   scope[i]   = cumulative scope up to period i (baseline folded in)
//   current[i] = cumulative completions up to period i, only for periods
//                that have started by `now`
//   ideal[i]   = total_scope * (i + 1) / len(axis)
//
// Out-of-order data (current above scope) is passed through untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregator::{cumulative_with_baseline, DatedEvent};
use crate::period_axis::PeriodAxis;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Burnup {
    pub scope: Vec<f64>,
    pub current: Vec<f64>,
    pub ideal: Vec<f64>,
}

impl Burnup {
    /// Latest completion total, 0 when nothing is rendered yet
    pub fn delivered(&self) -> f64 {
        self.current.last().copied().unwrap_or(0.0)
    }

    /// Delivered share of the final scope, in percent
    pub fn percent_complete(&self) -> f64 {
        match self.scope.last() {
            Some(&scope) if scope > 0.0 => self.delivered() / scope * 100.0,
            _ => 0.0,
        }
    }
}

/// Straight line from 0 to `total_scope` across `periods` periods
pub fn ideal_line(total_scope: f64, periods: usize) -> Vec<f64> {
    (0..periods)
        .map(|i| total_scope * (i + 1) as f64 / periods as f64)
        .collect()
}

pub fn burnup(
    axis: &PeriodAxis,
    scope_events: &[DatedEvent],
    completion_events: &[DatedEvent],
    total_scope: f64,
    now: NaiveDate,
) -> Burnup {
    if axis.is_empty() {
        return Burnup::default();
    }

    let scope = cumulative_with_baseline(scope_events, axis);

    let mut current = cumulative_with_baseline(completion_events, axis);
    current.truncate(axis.periods_started_by(now));

    if current.iter().zip(&scope).any(|(done, scope)| done > scope) {
        tracing::warn!("completions exceed scope in at least one period; passing through");
    }

    tracing::debug!(
        periods = axis.len(),
        rendered = current.len(),
        total_scope,
        "computed burnup"
    );

    Burnup {
        scope,
        current,
        ideal: ideal_line(total_scope, axis.len()),
    }
}

/// Burnup whose ideal line targets the final scope value
pub fn burnup_to_final_scope(
    axis: &PeriodAxis,
    scope_events: &[DatedEvent],
    completion_events: &[DatedEvent],
    now: NaiveDate,
) -> Burnup {
    let final_scope = cumulative_with_baseline(scope_events, axis)
        .last()
        .copied()
        .unwrap_or(0.0);
    burnup(axis, scope_events, completion_events, final_scope, now)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period_axis::{axis, Granularity};
    use chrono::Duration;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_series(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_weekly_burnup_stops_current_at_now() {
        // Wednesday 2024-05-15; axis spans 4 weeks back to 3 weeks ahead
        let now = date(2024, 5, 15);
        let axis = axis(now - Duration::weeks(4), now + Duration::weeks(3), Granularity::Week);
        assert_eq!(axis.len(), 8);

        let created = now - Duration::weeks(3);
        let scope_events: Vec<DatedEvent> =
            (0..5).map(|_| DatedEvent::new(created, 1.0)).collect();
        let completions = vec![
            DatedEvent::new(now - Duration::weeks(2), 1.0),
            DatedEvent::new(now - Duration::weeks(1), 1.0),
            DatedEvent::new(now - Duration::weeks(1), 1.0),
            DatedEvent::new(now, 1.0),
        ];

        let burnup = burnup(&axis, &scope_events, &completions, 5.0, now);

        assert_series(&burnup.scope, &[0.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]);
        assert_series(&burnup.current, &[0.0, 0.0, 1.0, 3.0, 4.0]);
        assert_series(
            &burnup.ideal,
            &[0.625, 1.25, 1.875, 2.5, 3.125, 3.75, 4.375, 5.0],
        );
        assert!((burnup.percent_complete() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_ideal_targets_final_scope() {
        let axis = axis(date(2024, 1, 1), date(2024, 4, 30), Granularity::Month);
        let scope_events = vec![
            DatedEvent::new(date(2024, 1, 10), 2.0),
            DatedEvent::new(date(2024, 2, 10), 2.0),
            DatedEvent::new(date(2024, 3, 10), 1.0),
            DatedEvent::new(date(2024, 4, 10), 1.0),
        ];

        let burnup = burnup_to_final_scope(&axis, &scope_events, &[], date(2024, 6, 1));

        assert_series(&burnup.scope, &[2.0, 4.0, 5.0, 6.0]);
        assert_series(&burnup.ideal, &[1.5, 3.0, 4.5, 6.0]);
        assert_series(&burnup.current, &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_axis_yields_empty_burnup() {
        let axis = axis(date(2024, 2, 1), date(2024, 1, 1), Granularity::Week);
        let burnup = burnup(&axis, &[], &[], 10.0, date(2024, 1, 15));

        assert_eq!(burnup, Burnup::default());
        assert_eq!(burnup.percent_complete(), 0.0);
    }

    #[test]
    fn test_now_before_axis_renders_no_current() {
        let axis = axis(date(2024, 3, 1), date(2024, 3, 31), Granularity::Week);
        let burnup = burnup(&axis, &[], &[], 3.0, date(2024, 1, 1));

        assert!(burnup.current.is_empty());
        assert_eq!(burnup.scope.len(), axis.len());
    }

    #[test]
    fn test_zero_scope_ideal_is_flat() {
        assert_eq!(ideal_line(0.0, 3), vec![0.0, 0.0, 0.0]);
        assert!(ideal_line(5.0, 0).is_empty());
    }

    proptest! {
        #[test]
        fn ideal_is_linear_and_ends_at_total(total in 0.1f64..10_000.0, periods in 1usize..200) {
            let ideal = ideal_line(total, periods);

            prop_assert!((ideal[periods - 1] - total).abs() < 1e-6);
            prop_assert!(ideal.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
