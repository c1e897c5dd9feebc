// 🌊 Cumulative Flow Diagram Builder
//
// For each tracked (downstream) stage and each period: how many work items
// have entered that stage OR any later stage by the period end. A stage is
// "reached" once entered, even if the item left it since, so every line is
// non-decreasing and each stage's line is >= the line of the next stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{Stage, StageTransition};
use crate::period_axis::PeriodAxis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfdLine {
    pub stage_id: String,
    pub stage_name: String,
    pub is_end_point: bool,
    pub data: Vec<f64>,
}

/// Downstream stages in workflow order
pub fn tracked_stages(stages: &[Stage]) -> Vec<&Stage> {
    let mut tracked: Vec<&Stage> = stages.iter().filter(|stage| stage.is_downstream()).collect();
    tracked.sort_by_key(|stage| stage.order);
    tracked
}

pub fn cumulative_flow(
    axis: &PeriodAxis,
    stages: &[Stage],
    transitions: &[StageTransition],
) -> Vec<CfdLine> {
    let tracked = tracked_stages(stages);
    let position: HashMap<&str, usize> = tracked
        .iter()
        .enumerate()
        .map(|(index, stage)| (stage.id.as_str(), index))
        .collect();

    // Earliest entry per item per tracked stage
    let mut first_entry: HashMap<&str, Vec<Option<DateTime<Utc>>>> = HashMap::new();
    for transition in transitions {
        let Some(&index) = position.get(transition.stage_id.as_str()) else {
            continue;
        };
        let entries = first_entry
            .entry(transition.work_item_id.as_str())
            .or_insert_with(|| vec![None; tracked.len()]);
        entries[index] = Some(match entries[index] {
            Some(existing) => existing.min(transition.entered_at),
            None => transition.entered_at,
        });
    }

    // An item reaches stage s when it first enters s or any later stage
    let mut reached_on: Vec<Vec<chrono::NaiveDate>> = vec![Vec::new(); tracked.len()];
    for entries in first_entry.values() {
        let mut earliest: Option<DateTime<Utc>> = None;
        for index in (0..tracked.len()).rev() {
            earliest = match (earliest, entries[index]) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            if let Some(instant) = earliest {
                reached_on[index].push(instant.date_naive());
            }
        }
    }

    tracing::debug!(
        stages = tracked.len(),
        items = first_entry.len(),
        periods = axis.len(),
        "built cumulative flow"
    );

    tracked
        .iter()
        .zip(reached_on)
        .map(|(stage, dates)| CfdLine {
            stage_id: stage.id.clone(),
            stage_name: stage.name.clone(),
            is_end_point: stage.is_end_point,
            data: axis
                .iter()
                .map(|boundary| dates.iter().filter(|date| *date <= boundary).count() as f64)
                .collect(),
        })
        .collect()
}

/// Items that reached the first end-point stage (or any later stage) per period.
///
/// Zeros when no tracked stage is an end point.
pub fn delivered_line(lines: &[CfdLine], periods: usize) -> Vec<f64> {
    lines
        .iter()
        .find(|line| line.is_end_point)
        .map(|line| line.data.clone())
        .unwrap_or_else(|| vec![0.0; periods])
}

// ============================================================================
// TESTS
// ============================================================================
