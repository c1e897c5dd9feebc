// ⏱️ Flow Efficiency & Queue/Touch Calculator
//
// Integrates time-in-stage intervals against the axis:
//   queue[i], touch[i]  = hours of overlap with period i
//   flow_efficiency[i]  = touch / (queue + touch) * 100, 0 when both are 0
//
// An interval spanning several periods is apportioned by time to each period
// it intersects. Open intervals are resolved at aggregation time (see
// `IntervalEnd::resolve`); the source entities are never touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::aggregator::{block_events, per_period, BlockEvent};
use crate::entities::{Block, IntervalEnd, Stage, StageKind, StageTransition};
use crate::period_axis::PeriodAxis;

// ============================================================================
// TIMED INTERVAL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedInterval {
    pub start: DateTime<Utc>,
    pub end: IntervalEnd,
    pub kind: StageKind,
}

/// Tag each transition with its stage kind.
///
/// Transitions into stages that are neither queue nor touch are skipped.
pub fn stage_intervals(transitions: &[StageTransition], stages: &[Stage]) -> Vec<TimedInterval> {
    let kinds: HashMap<&str, Option<StageKind>> = stages
        .iter()
        .map(|stage| (stage.id.as_str(), stage.kind()))
        .collect();

    transitions
        .iter()
        .filter_map(|transition| match kinds.get(transition.stage_id.as_str()) {
            Some(Some(kind)) => Some(TimedInterval {
                start: transition.entered_at,
                end: transition.left_at,
                kind: *kind,
            }),
            Some(None) => None,
            None => {
                tracing::warn!(
                    stage_id = %transition.stage_id,
                    work_item_id = %transition.work_item_id,
                    "transition references unknown stage"
                );
                None
            }
        })
        .collect()
}

// ============================================================================
// OVERLAP INTEGRATION
// ============================================================================

/// Hours of each interval overlapping each period, summed per period
pub fn overlap_hours<I>(axis: &PeriodAxis, intervals: I, now: DateTime<Utc>) -> Vec<f64>
where
    I: IntoIterator<Item = (DateTime<Utc>, IntervalEnd)>,
{
    let mut series = vec![0.0; axis.len()];
    let (range_start, range_end) = match axis.range_window() {
        Some(range) => range,
        None => return series,
    };

    let windows: Vec<(DateTime<Utc>, DateTime<Utc>)> =
        (0..axis.len()).filter_map(|i| axis.period_window(i)).collect();

    for (start, end) in intervals {
        let end = end.resolve(now, range_start, range_end);
        if end <= start || end <= range_start || start >= range_end {
            continue;
        }

        for (index, (window_start, window_end)) in windows.iter().enumerate() {
            let from = start.max(*window_start);
            let to = end.min(*window_end);
            if to > from {
                series[index] += (to - from).num_seconds() as f64 / 3600.0;
            }
        }
    }
    series
}

// ============================================================================
// QUEUE / TOUCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueueTouchSeries {
    pub queue_hours: Vec<f64>,
    pub touch_hours: Vec<f64>,
    pub flow_efficiency: Vec<f64>,
}

impl QueueTouchSeries {
    /// Efficiency over the whole axis
    pub fn overall_efficiency(&self) -> f64 {
        flow_efficiency(
            self.queue_hours.iter().sum(),
            self.touch_hours.iter().sum(),
        )
    }
}

/// touch / (queue + touch) * 100, 0 when there is no time at all
pub fn flow_efficiency(queue: f64, touch: f64) -> f64 {
    let total = queue + touch;
    if total <= 0.0 {
        0.0
    } else {
        touch / total * 100.0
    }
}

pub fn queue_touch(
    axis: &PeriodAxis,
    intervals: &[TimedInterval],
    now: DateTime<Utc>,
) -> QueueTouchSeries {
    let of_kind = |kind: StageKind| {
        intervals
            .iter()
            .filter(move |interval| interval.kind == kind)
            .map(|interval| (interval.start, interval.end))
    };

    let queue_hours = overlap_hours(axis, of_kind(StageKind::Queue), now);
    let touch_hours = overlap_hours(axis, of_kind(StageKind::Touch), now);
    let flow_efficiency = queue_hours
        .iter()
        .zip(&touch_hours)
        .map(|(queue, touch)| flow_efficiency(*queue, *touch))
        .collect();

    tracing::debug!(
        periods = axis.len(),
        intervals = intervals.len(),
        "computed queue/touch series"
    );

    QueueTouchSeries {
        queue_hours,
        touch_hours,
        flow_efficiency,
    }
}

// ============================================================================
// BLOCKED TIME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockedTimeSeries {
    /// Hours blocked per period
    pub blocked_hours: Vec<f64>,

    /// Blocks opened per period
    pub blocks_opened: Vec<f64>,
}

/// Blocked time of active blocks, apportioned like stage time
pub fn blocked_time(axis: &PeriodAxis, blocks: &[Block], now: DateTime<Utc>) -> BlockedTimeSeries {
    let active = blocks
        .iter()
        .filter(|block| block.is_active)
        .map(|block| (block.blocked_at, block.unblocked_at));

    BlockedTimeSeries {
        blocked_hours: overlap_hours(axis, active, now),
        blocks_opened: per_period(&block_events(blocks, BlockEvent::Blocked), axis),
    }
}

// ============================================================================
// TESTS
// ============================================================================
