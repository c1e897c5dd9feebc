// 🚚 Delivery Metrics - lead time, throughput, WIP, control chart
//
// Lead time runs from commitment to completion (creation when the item was
// never committed), measured in fractional days.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregator::{per_period, work_item_events, Weight, WorkItemEvent};
use crate::entities::{WorkItem, WorkItemType};
use crate::period_axis::PeriodAxis;
use crate::statistics::{percentile, PercentileValue};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Lead time in days, None for unfinished items
pub fn lead_time_days(item: &WorkItem) -> Option<f64> {
    let completed_at = item.completed_at?;
    let seconds = (completed_at - item.lead_time_start()).num_seconds().max(0);
    Some(seconds as f64 / SECONDS_PER_DAY)
}

// ============================================================================
// THROUGHPUT & WIP
// ============================================================================

/// Completed items per period
pub fn throughput(axis: &PeriodAxis, items: &[WorkItem]) -> Vec<f64> {
    per_period(
        &work_item_events(items, WorkItemEvent::Completed, Weight::Count),
        axis,
    )
}

/// Completed items per period for one work item type
pub fn throughput_by_type(axis: &PeriodAxis, items: &[WorkItem], item_type: WorkItemType) -> Vec<f64> {
    let of_type = items.iter().filter(|item| item.item_type == item_type);
    per_period(
        &work_item_events(of_type, WorkItemEvent::Completed, Weight::Count),
        axis,
    )
}

/// Items committed by the period end and neither completed nor discarded at that point
pub fn work_in_progress(axis: &PeriodAxis, items: &[WorkItem]) -> Vec<f64> {
    axis.iter()
        .map(|&boundary| {
            items
                .iter()
                .filter(|item| {
                    let committed = item
                        .commitment_at
                        .map_or(false, |at| at.date_naive() <= boundary);
                    let open = item
                        .completed_at
                        .map_or(true, |at| at.date_naive() > boundary);
                    let kept = item
                        .discarded_at
                        .map_or(true, |at| at.date_naive() > boundary);
                    committed && open && kept
                })
                .count() as f64
        })
        .collect()
}

// ============================================================================
// CONTROL CHART
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChartPoint {
    pub work_item_id: String,
    pub completed_at: DateTime<Utc>,
    pub lead_time_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChart {
    /// Completed items in completion order
    pub points: Vec<ControlChartPoint>,

    /// Horizontal reference lines
    pub percentile_lines: Vec<PercentileValue>,
}

impl ControlChart {
    pub fn lead_times(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.lead_time_days).collect()
    }
}

/// Lead-time control chart over items completed inside the axis range
pub fn control_chart(axis: &PeriodAxis, items: &[WorkItem], levels: &[f64]) -> ControlChart {
    let (from, to) = match (axis.period_start(0), axis.last()) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return ControlChart {
                points: Vec::new(),
                percentile_lines: levels
                    .iter()
                    .map(|&level| PercentileValue { percentile: level, value: 0.0 })
                    .collect(),
            }
        }
    };

    let mut points: Vec<ControlChartPoint> = items
        .iter()
        .filter_map(|item| {
            let completed_at = item.completed_at?;
            if !(from..=to).contains(&completed_at.date_naive()) {
                return None;
            }
            Some(ControlChartPoint {
                work_item_id: item.id.clone(),
                completed_at,
                lead_time_days: lead_time_days(item)?,
            })
        })
        .collect();
    points.sort_by_key(|point| point.completed_at);

    let lead_times: Vec<f64> = points.iter().map(|point| point.lead_time_days).collect();
    let percentile_lines = levels
        .iter()
        .map(|&level| PercentileValue {
            percentile: level,
            value: percentile(&lead_times, level),
        })
        .collect();

    ControlChart {
        points,
        percentile_lines,
    }
}

// ============================================================================
// TESTS
// ============================================================================
