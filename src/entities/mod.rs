// Entity Models - read-only inputs of the engine
//
// Every record here is owned by an external persistence layer. The engine
// receives already-scoped collections (company, project, team) and never
// mutates them: open intervals stay open on the entity and are only resolved
// to a concrete instant at aggregation time.

pub mod work_item;
pub mod stage;
pub mod block;
pub mod project;
pub mod financial;

pub use work_item::{WorkItem, WorkItemType, ClassOfService};
pub use stage::{Stage, StageKind, StageTransition, Stream};
pub use block::Block;
pub use project::Project;
pub use financial::{FinancialEntry, ConsolidatedMonth};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// INTERVAL END
// ============================================================================

/// End bound of a stage transition or block.
///
/// Serialized as an optional timestamp (`null` = still open) so exported
/// datasets stay flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<DateTime<Utc>>", into = "Option<DateTime<Utc>>")]
pub enum IntervalEnd {
    Bounded(DateTime<Utc>),
    Open,
}

impl IntervalEnd {
    pub fn is_open(&self) -> bool {
        matches!(self, IntervalEnd::Open)
    }

    pub fn as_option(&self) -> Option<DateTime<Utc>> {
        match self {
            IntervalEnd::Bounded(end) => Some(*end),
            IntervalEnd::Open => None,
        }
    }

    /// Resolve to a concrete instant for aggregation over `[range_start, range_end]`.
    ///
    /// An open end becomes `now` when `now` falls inside the range, otherwise
    /// the range end.
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> DateTime<Utc> {
        match self {
            IntervalEnd::Bounded(end) => *end,
            IntervalEnd::Open if now >= range_start && now <= range_end => now,
            IntervalEnd::Open => range_end,
        }
    }
}

impl From<Option<DateTime<Utc>>> for IntervalEnd {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        match value {
            Some(end) => IntervalEnd::Bounded(end),
            None => IntervalEnd::Open,
        }
    }
}

impl From<IntervalEnd> for Option<DateTime<Utc>> {
    fn from(value: IntervalEnd) -> Self {
        value.as_option()
    }
}

impl Default for IntervalEnd {
    fn default() -> Self {
        IntervalEnd::Open
    }
}

// Helper for serde defaults
pub(crate) fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_bounded_end_ignores_now() {
        let end = IntervalEnd::Bounded(at(5, 12));
        assert_eq!(end.resolve(at(10, 0), at(1, 0), at(20, 0)), at(5, 12));
    }

    #[test]
    fn test_open_end_resolves_to_now_inside_range() {
        let end = IntervalEnd::Open;
        assert_eq!(end.resolve(at(10, 0), at(1, 0), at(20, 0)), at(10, 0));
    }

    #[test]
    fn test_open_end_truncated_at_range_end() {
        let end = IntervalEnd::Open;
        assert_eq!(end.resolve(at(25, 0), at(1, 0), at(20, 0)), at(20, 0));
        assert_eq!(end.resolve(at(1, 0) - chrono::Duration::days(3), at(1, 0), at(20, 0)), at(20, 0));
    }

    #[test]
    fn test_interval_end_serializes_as_option() {
        let open = serde_json::to_string(&IntervalEnd::Open).unwrap();
        assert_eq!(open, "null");

        let bounded: IntervalEnd = serde_json::from_str("\"2024-03-05T12:00:00Z\"").unwrap();
        assert_eq!(bounded, IntervalEnd::Bounded(at(5, 12)));
    }
}
