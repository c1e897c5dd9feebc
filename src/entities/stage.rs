// 🚦 Stage Entity - a column of the delivery workflow
//
// Stages are ordered by `order`. Queue stages are waiting (non-value-add)
// time, touch stages are active work. A stage flagged `is_end_point` counts
// as "delivered" once reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IntervalEnd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Upstream,
    Downstream,
}

impl Default for Stream {
    fn default() -> Self {
        Stream::Downstream
    }
}

/// Time classification used by flow efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    Queue,
    Touch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,

    /// Position in the workflow (ascending = later)
    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub stream: Stream,

    #[serde(default)]
    pub is_queue: bool,

    #[serde(default)]
    pub is_touch: bool,

    #[serde(default)]
    pub is_end_point: bool,
}

impl Stage {
    pub fn new(id: &str, name: &str, order: i32) -> Self {
        Stage {
            id: id.to_string(),
            name: name.to_string(),
            order,
            stream: Stream::Downstream,
            is_queue: false,
            is_touch: false,
            is_end_point: false,
        }
    }

    pub fn queue(mut self) -> Self {
        self.is_queue = true;
        self.is_touch = false;
        self
    }

    pub fn touch(mut self) -> Self {
        self.is_touch = true;
        self.is_queue = false;
        self
    }

    pub fn upstream(mut self) -> Self {
        self.stream = Stream::Upstream;
        self
    }

    pub fn end_point(mut self) -> Self {
        self.is_end_point = true;
        self
    }

    /// Queue wins when both flags are set; None when neither is.
    pub fn kind(&self) -> Option<StageKind> {
        if self.is_queue {
            Some(StageKind::Queue)
        } else if self.is_touch {
            Some(StageKind::Touch)
        } else {
            None
        }
    }

    pub fn is_downstream(&self) -> bool {
        self.stream == Stream::Downstream
    }
}

// ============================================================================
// STAGE TRANSITION
// ============================================================================

/// Time a work item spent in one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub work_item_id: String,
    pub stage_id: String,
    pub entered_at: DateTime<Utc>,

    /// Open while the item is still in the stage
    #[serde(default)]
    pub left_at: IntervalEnd,
}

impl StageTransition {
    pub fn new(work_item_id: &str, stage_id: &str, entered_at: DateTime<Utc>) -> Self {
        StageTransition {
            work_item_id: work_item_id.to_string(),
            stage_id: stage_id.to_string(),
            entered_at,
            left_at: IntervalEnd::Open,
        }
    }

    pub fn left(mut self, left_at: DateTime<Utc>) -> Self {
        self.left_at = IntervalEnd::Bounded(left_at);
        self
    }
}
