// 🪣 Bucketed Event Aggregator - dated events → per-period series
//
// Period i receives the events dated inside (axis[i-1], axis[i]].
// Two flavours:
//   per_period               → events before the first period are dropped
//   per_period_with_baseline → events before the first period land in
//                              period 0, i.e. period 0 is (-∞, axis[0]]
// Events after the last boundary never contribute.
//
// Discarded work items are kept unless the caller filters them out with
// `exclude_discarded`: past periods must keep showing what happened.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Block, IntervalEnd, Project, StageTransition, WorkItem};
use crate::period_axis::PeriodAxis;

// ============================================================================
// DATED EVENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedEvent {
    pub date: NaiveDate,
    pub weight: f64,
}

impl DatedEvent {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        DatedEvent { date, weight }
    }

    /// Event at `instant`, truncated to its UTC date
    pub fn at(instant: DateTime<Utc>, weight: f64) -> Self {
        DatedEvent {
            date: instant.date_naive(),
            weight,
        }
    }

    pub fn count(instant: DateTime<Utc>) -> Self {
        DatedEvent::at(instant, 1.0)
    }
}

// ============================================================================
// BUCKETING
// ============================================================================

/// Sum of weights per period; events outside the axis are ignored
pub fn per_period(events: &[DatedEvent], axis: &PeriodAxis) -> Vec<f64> {
    let mut series = vec![0.0; axis.len()];
    for event in events {
        if let Some(index) = axis.index_of(event.date) {
            series[index] += event.weight;
        }
    }
    series
}

/// Like [`per_period`], folding events dated before the axis into period 0
pub fn per_period_with_baseline(events: &[DatedEvent], axis: &PeriodAxis) -> Vec<f64> {
    let mut series = vec![0.0; axis.len()];
    let first_start = match axis.period_start(0) {
        Some(start) => start,
        None => return series,
    };

    for event in events {
        if event.date < first_start {
            series[0] += event.weight;
        } else if let Some(index) = axis.index_of(event.date) {
            series[index] += event.weight;
        }
    }
    series
}

/// Running prefix sum
pub fn cumulative(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .scan(0.0, |total, value| {
            *total += value;
            Some(*total)
        })
        .collect()
}

/// Cumulative totals including everything that happened before the axis
pub fn cumulative_with_baseline(events: &[DatedEvent], axis: &PeriodAxis) -> Vec<f64> {
    cumulative(&per_period_with_baseline(events, axis))
}

// ============================================================================
// WORK ITEM EVENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItemEvent {
    Created,
    Committed,
    Completed,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weight {
    /// Every event weighs 1
    Count,
    /// Upstream + downstream hours
    Effort,
    UpstreamEffort,
    DownstreamEffort,
}

impl Weight {
    fn of(&self, item: &WorkItem) -> f64 {
        match self {
            Weight::Count => 1.0,
            Weight::Effort => item.total_effort(),
            Weight::UpstreamEffort => item.effort_upstream,
            Weight::DownstreamEffort => item.effort_downstream,
        }
    }
}

/// One event per item that reached `event`
pub fn work_item_events<'a, I>(items: I, event: WorkItemEvent, weight: Weight) -> Vec<DatedEvent>
where
    I: IntoIterator<Item = &'a WorkItem>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let instant = match event {
                WorkItemEvent::Created => Some(item.created_at),
                WorkItemEvent::Committed => item.commitment_at,
                WorkItemEvent::Completed => item.completed_at,
                WorkItemEvent::Discarded => item.discarded_at,
            }?;
            Some(DatedEvent::at(instant, weight.of(item)))
        })
        .collect()
}

/// Items that were never discarded
pub fn exclude_discarded(items: &[WorkItem]) -> Vec<&WorkItem> {
    items.iter().filter(|item| !item.is_discarded()).collect()
}

/// Scope events of a project: the initial scope at project start plus one
/// event per registered item at its creation date
pub fn scope_events(project: &Project, items: &[WorkItem]) -> Vec<DatedEvent> {
    let mut events = Vec::new();
    if project.initial_scope > 0 {
        events.push(DatedEvent::new(project.start_date, project.initial_scope as f64));
    }
    events.extend(work_item_events(project.items(items), WorkItemEvent::Created, Weight::Count));
    events
}

// ============================================================================
// BLOCK & TRANSITION EVENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockEvent {
    Blocked,
    Unblocked,
}

/// Block/unblock events of active blocks (cancelled blocks are skipped)
pub fn block_events(blocks: &[Block], event: BlockEvent) -> Vec<DatedEvent> {
    blocks
        .iter()
        .filter(|block| block.is_active)
        .filter_map(|block| match event {
            BlockEvent::Blocked => Some(DatedEvent::count(block.blocked_at)),
            BlockEvent::Unblocked => block.unblocked_at.as_option().map(DatedEvent::count),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionEvent {
    In,
    Out,
}

/// Stage entry/exit events, optionally restricted to one stage
pub fn transition_events(
    transitions: &[StageTransition],
    stage_id: Option<&str>,
    event: TransitionEvent,
) -> Vec<DatedEvent> {
    transitions
        .iter()
        .filter(|transition| stage_id.map_or(true, |id| transition.stage_id == id))
        .filter_map(|transition| match (event, transition.left_at) {
            (TransitionEvent::In, _) => Some(DatedEvent::count(transition.entered_at)),
            (TransitionEvent::Out, IntervalEnd::Bounded(left_at)) => Some(DatedEvent::count(left_at)),
            (TransitionEvent::Out, IntervalEnd::Open) => None,
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::WorkItem;
    use crate::period_axis::{axis, Granularity};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, d, 15, 30, 0).unwrap()
    }

    fn march_weeks() -> PeriodAxis {
        // boundaries 03-10, 03-17, 03-24
        axis(date(2024, 3, 6), date(2024, 3, 20), Granularity::Week)
    }

    #[test]
    fn test_per_period_boundaries() {
        let events = vec![
            DatedEvent::new(date(2024, 3, 4), 1.0),  // first day of period 0
            DatedEvent::new(date(2024, 3, 10), 1.0), // boundary belongs to period 0
            DatedEvent::new(date(2024, 3, 11), 2.0), // first day of period 1
            DatedEvent::new(date(2024, 3, 24), 1.0), // last boundary
        ];

        assert_eq!(per_period(&events, &march_weeks()), vec![2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_per_period_excludes_out_of_range() {
        let events = vec![
            DatedEvent::new(date(2024, 3, 3), 5.0),
            DatedEvent::new(date(2024, 3, 25), 7.0),
            DatedEvent::new(date(2024, 3, 12), 1.0),
        ];

        assert_eq!(per_period(&events, &march_weeks()), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_baseline_folds_earlier_events_into_first_period() {
        let events = vec![
            DatedEvent::new(date(2023, 12, 1), 3.0),
            DatedEvent::new(date(2024, 3, 12), 1.0),
            DatedEvent::new(date(2024, 4, 2), 9.0),
        ];

        let series = per_period_with_baseline(&events, &march_weeks());
        assert_eq!(series, vec![3.0, 1.0, 0.0]);
        assert_eq!(cumulative(&series), vec![3.0, 4.0, 4.0]);
    }

    #[test]
    fn test_empty_axis_yields_empty_series() {
        let empty = axis(date(2024, 3, 6), date(2024, 3, 1), Granularity::Day);
        let events = vec![DatedEvent::new(date(2024, 3, 2), 1.0)];

        assert!(per_period(&events, &empty).is_empty());
        assert!(per_period_with_baseline(&events, &empty).is_empty());
        assert!(cumulative(&[]).is_empty());
    }

    #[test]
    fn test_work_item_events_keep_discarded_items() {
        let items = vec![
            WorkItem::new(instant(3, 5)).with_completion(instant(3, 12)).with_effort(2.0, 6.0),
            WorkItem::new(instant(3, 6))
                .with_discard(instant(3, 7))
                .with_completion(instant(3, 19))
                .with_effort(1.0, 1.0),
            WorkItem::new(instant(3, 8)),
        ];

        let completed = work_item_events(&items, WorkItemEvent::Completed, Weight::Count);
        assert_eq!(completed.len(), 2);

        let hours = work_item_events(&items, WorkItemEvent::Completed, Weight::Effort);
        assert_eq!(per_period(&hours, &march_weeks()), vec![0.0, 8.0, 2.0]);

        let kept = exclude_discarded(&items);
        assert_eq!(work_item_events(kept, WorkItemEvent::Completed, Weight::Count).len(), 1);
    }

    #[test]
    fn test_scope_events_include_initial_scope() {
        let project = Project::new("p1", "Checkout", date(2024, 3, 1), date(2024, 3, 31))
            .with_initial_scope(4);
        let items = vec![
            WorkItem::new(instant(3, 12)).with_project("p1"),
            WorkItem::new(instant(3, 12)).with_project("p2"),
        ];

        let series = cumulative_with_baseline(&scope_events(&project, &items), &march_weeks());
        assert_eq!(series, vec![4.0, 5.0, 5.0]);
    }

    #[test]
    fn test_block_events_skip_inactive_and_open() {
        let blocks = vec![
            Block::new("w1", instant(3, 5)).unblocked(instant(3, 13)),
            Block::new("w2", instant(3, 12)),
            Block::new("w3", instant(3, 12)).unblocked(instant(3, 13)).inactive(),
        ];

        let blocked = per_period(&block_events(&blocks, BlockEvent::Blocked), &march_weeks());
        let unblocked = per_period(&block_events(&blocks, BlockEvent::Unblocked), &march_weeks());

        assert_eq!(blocked, vec![1.0, 1.0, 0.0]);
        assert_eq!(unblocked, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_transition_events_by_stage() {
        let transitions = vec![
            StageTransition::new("w1", "doing", instant(3, 5)).left(instant(3, 11)),
            StageTransition::new("w2", "doing", instant(3, 12)),
            StageTransition::new("w1", "review", instant(3, 11)),
        ];

        let entered = transition_events(&transitions, Some("doing"), TransitionEvent::In);
        let left = transition_events(&transitions, Some("doing"), TransitionEvent::Out);
        let all_in = transition_events(&transitions, None, TransitionEvent::In);

        assert_eq!(per_period(&entered, &march_weeks()), vec![1.0, 1.0, 0.0]);
        assert_eq!(per_period(&left, &march_weeks()), vec![0.0, 1.0, 0.0]);
        assert_eq!(all_in.len(), 3);
    }

    proptest! {
        #[test]
        fn cumulative_is_non_decreasing(series in prop::collection::vec(0.0f64..1000.0, 0..100)) {
            let totals = cumulative(&series);

            prop_assert_eq!(totals.len(), series.len());
            prop_assert!(totals.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        #[test]
        fn baseline_never_drops_in_range_events(offsets in prop::collection::vec(-40i64..40, 0..50)) {
            let axis = march_weeks();
            let events: Vec<DatedEvent> = offsets
                .iter()
                .map(|offset| DatedEvent::new(date(2024, 3, 10) + chrono::Duration::days(*offset), 1.0))
                .collect();
            let last = axis.last().unwrap();
            let expected = events.iter().filter(|e| e.date <= last).count() as f64;

            let total: f64 = per_period_with_baseline(&events, &axis).iter().sum();
            prop_assert!((total - expected).abs() < 1e-9);
        }
    }
}
